// src/models/settings.rs

use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

// Rótulos canônicos de status usados pela agregação. As listas são editáveis
// pelo usuário, mas o funil e os encerramentos são ancorados nestes valores.
pub const STATUS_GANHO: &str = "Ganho (Vendido)";
pub const STATUS_PERDIDO: &str = "Perdido";
pub const STATUS_NUTRICAO: &str = "Nutrição";

// Status que contam no denominador da taxa de conversão (estágio avançado).
pub const FUNIL_CONVERSAO: [&str; 4] = [
    "Qualificado",
    "Proposta Enviada",
    "Negociação",
    STATUS_GANHO,
];

// Status fora da contagem de "leads ativos".
pub const STATUS_ENCERRADOS: [&str; 3] = [STATUS_GANHO, STATUS_PERDIDO, STATUS_NUTRICAO];

/// Documento único de configurações do usuário: as seis listas de taxonomia
/// que alimentam os formulários e ordenam os gráficos. A ordem declarada é
/// significativa. Remover um item não invalida leads antigos que o usam
/// (o valor fica órfão, apenas para exibição).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[schema(example = json!(["Facebook Ads", "Indicação"]))]
    pub origem_lead: Vec<String>,

    #[schema(example = json!(["Novo", "Qualificado", "Ganho (Vendido)"]))]
    pub status_lead: Vec<String>,

    #[schema(example = json!(["Produto A", "Produto B"]))]
    pub produto_interesse: Vec<String>,

    #[schema(example = json!(["Quente", "Morno", "Frio"]))]
    pub temperatura: Vec<String>,

    #[schema(example = json!(["Preço", "Sem interesse"]))]
    pub motivo_perda: Vec<String>,

    #[schema(example = json!(["Eu"]))]
    pub responsaveis: Vec<String>,
}

impl Default for AppSettings {
    // O conjunto padrão criado na primeira leitura de um usuário novo.
    fn default() -> Self {
        let lista = |itens: &[&str]| itens.iter().map(|s| s.to_string()).collect();
        Self {
            origem_lead: lista(&[
                "Facebook Ads",
                "Instagram Ads",
                "Google Orgânico",
                "Indicação",
                "E-mail Mkt",
                "WhatsApp",
            ]),
            status_lead: lista(&[
                "Novo",
                "Contatado",
                "Qualificado",
                "Proposta Enviada",
                "Negociação",
                "Ganho (Vendido)",
                "Perdido",
                "Nutrição",
            ]),
            produto_interesse: lista(&["Produto A", "Produto B", "Produto C"]),
            temperatura: lista(&["Quente", "Morno", "Frio"]),
            motivo_perda: lista(&[
                "Preço",
                "Não respondeu",
                "Comprou concorrente",
                "Sem interesse",
                "Precisa de mais info",
                "Outro",
            ]),
            responsaveis: lista(&["Eu"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padrao_contem_as_seis_listas_esperadas() {
        let padrao = AppSettings::default();
        assert_eq!(padrao.origem_lead.len(), 6);
        assert_eq!(padrao.status_lead.len(), 8);
        assert_eq!(padrao.produto_interesse.len(), 3);
        assert_eq!(padrao.temperatura.len(), 3);
        assert_eq!(padrao.motivo_perda.len(), 6);
        assert_eq!(padrao.responsaveis, vec!["Eu"]);
    }

    #[test]
    fn rotulos_canonicos_pertencem_a_lista_padrao_de_status() {
        let padrao = AppSettings::default();
        for status in STATUS_ENCERRADOS {
            assert!(padrao.status_lead.iter().any(|s| s == status));
        }
        for status in FUNIL_CONVERSAO {
            assert!(padrao.status_lead.iter().any(|s| s == status));
        }
    }

    #[test]
    fn documento_serializa_com_os_nomes_do_backend() {
        let json = serde_json::to_value(AppSettings::default()).unwrap();
        for chave in [
            "origemLead",
            "statusLead",
            "produtoInteresse",
            "temperatura",
            "motivoPerda",
            "responsaveis",
        ] {
            assert!(json.get(chave).is_some(), "faltou a chave {chave}");
        }
    }
}
