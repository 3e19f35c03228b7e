// src/models/lead.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Um lead do funil de vendas, sempre pertencente a um único usuário.
///
/// Os campos de taxonomia (origem, status, temperatura, produto, responsável)
/// guardam o rótulo escolhido na época do cadastro; a restrição contra as
/// listas de configuração é suave, então um rótulo removido depois continua
/// aqui como valor órfão.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,

    #[schema(example = "Maria da Silva")]
    pub nome: String,
    #[schema(example = "(11) 99999-8888")]
    pub telefone: String,
    #[schema(example = "maria@email.com")]
    pub email: String,
    #[schema(example = "Campinas/SP")]
    pub cidade: String,

    #[schema(example = "Facebook Ads")]
    pub origem_lead: String,
    #[schema(example = "Produto A")]
    pub produto_interesse: String,
    #[schema(example = "Novo")]
    pub status_lead: String,
    #[schema(example = "Quente")]
    pub temperatura: String,
    #[schema(example = "Eu")]
    pub responsavel: String,

    // Datas de calendário, sem fuso: "2024-03-05" entra e sai como
    // "2024-03-05", independente do offset do servidor.
    #[schema(value_type = String, format = Date, example = "2024-03-05")]
    pub data_entrada: NaiveDate,
    #[schema(value_type = Option<String>, format = Date)]
    pub proximo_contato: Option<NaiveDate>,

    pub observacoes: String,

    // Presentes apenas quando status = "Ganho (Vendido)". Ausência é NULL,
    // nunca zero.
    #[schema(value_type = Option<f64>, example = 1500.50)]
    pub valor_venda: Option<Decimal>,
    #[schema(value_type = Option<String>, format = Date)]
    pub data_venda: Option<NaiveDate>,

    // Presente apenas quando status = "Perdido".
    pub motivo_perda: Option<String>,

    // Atribuído pelo servidor na criação; imutável.
    pub created_at: DateTime<Utc>,
}

/// Payload de criação/edição. A edição substitui todos os campos editáveis
/// (o formulário sempre envia o registro completo); `id` e `createdAt` nunca
/// mudam.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadPayload {
    #[validate(length(min = 1, message = "O nome do lead é obrigatório."))]
    #[schema(example = "Maria da Silva")]
    pub nome: String,

    #[serde(default)]
    pub telefone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub cidade: String,

    #[serde(default)]
    #[schema(example = "Facebook Ads")]
    pub origem_lead: String,
    #[serde(default)]
    #[schema(example = "Produto A")]
    pub produto_interesse: String,

    #[validate(length(min = 1, message = "O status do lead é obrigatório."))]
    #[schema(example = "Novo")]
    pub status_lead: String,

    #[serde(default)]
    #[schema(example = "Quente")]
    pub temperatura: String,
    #[serde(default)]
    #[schema(example = "Eu")]
    pub responsavel: String,

    #[schema(value_type = String, format = Date, example = "2024-03-05")]
    pub data_entrada: NaiveDate,
    #[schema(value_type = Option<String>, format = Date)]
    pub proximo_contato: Option<NaiveDate>,

    #[serde(default)]
    pub observacoes: String,

    #[schema(value_type = Option<f64>, example = 1500.50)]
    pub valor_venda: Option<Decimal>,
    #[schema(value_type = Option<String>, format = Date)]
    pub data_venda: Option<NaiveDate>,

    pub motivo_perda: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead_exemplo() -> Lead {
        Lead {
            id: Uuid::new_v4(),
            nome: "Maria da Silva".into(),
            telefone: "".into(),
            email: "".into(),
            cidade: "".into(),
            origem_lead: "Indicação".into(),
            produto_interesse: "Produto A".into(),
            status_lead: "Novo".into(),
            temperatura: "Quente".into(),
            responsavel: "Eu".into(),
            data_entrada: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            proximo_contato: None,
            observacoes: "".into(),
            valor_venda: None,
            data_venda: None,
            motivo_perda: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn data_de_entrada_faz_round_trip_como_data_de_calendario() {
        // "2024-03-05" escrita e lida de volta continua "2024-03-05",
        // independente do fuso do processo.
        let lead = lead_exemplo();
        let json = serde_json::to_value(&lead).unwrap();
        assert_eq!(json["dataEntrada"], "2024-03-05");

        let relido: Lead = serde_json::from_value(json).unwrap();
        assert_eq!(relido.data_entrada, lead.data_entrada);
    }

    #[test]
    fn ausencia_de_valor_de_venda_serializa_como_null() {
        let json = serde_json::to_value(lead_exemplo()).unwrap();
        assert!(json["valorVenda"].is_null());
        assert!(json["dataVenda"].is_null());
        assert!(json["motivoPerda"].is_null());
    }

    #[test]
    fn payload_sem_nome_reprova_na_validacao() {
        let payload = LeadPayload {
            nome: "".into(),
            telefone: "".into(),
            email: "".into(),
            cidade: "".into(),
            origem_lead: "".into(),
            produto_interesse: "".into(),
            status_lead: "Novo".into(),
            temperatura: "".into(),
            responsavel: "".into(),
            data_entrada: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            proximo_contato: None,
            observacoes: "".into(),
            valor_venda: None,
            data_venda: None,
            motivo_perda: None,
        };
        assert!(payload.validate().is_err());
    }
}
