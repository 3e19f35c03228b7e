// src/models/meta.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Meta mensal de leads, receita e conversão. Os números realizados nunca são
/// persistidos: são derivados da coleção de leads na hora da leitura.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub id: Uuid,

    #[schema(example = "2024-03")]
    pub mes_ano: String,

    #[schema(example = 10)]
    pub meta_leads: i32,

    #[schema(value_type = f64, example = 25000.0)]
    pub meta_vendas: Decimal,

    #[schema(example = 30.0)]
    pub taxa_conversao_meta: f64,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetaPayload {
    // "YYYY-MM"; o formato é conferido no serviço, que precisa do mês parseado
    // de qualquer forma.
    #[validate(length(equal = 7, message = "Informe o mês no formato YYYY-MM."))]
    #[schema(example = "2024-03")]
    pub mes_ano: String,

    #[validate(range(min = 0, message = "A meta de leads não pode ser negativa."))]
    #[schema(example = 10)]
    pub meta_leads: i32,

    #[schema(value_type = f64, example = 25000.0)]
    pub meta_vendas: Decimal,

    #[validate(range(min = 0.0, max = 100.0, message = "A taxa deve estar entre 0 e 100."))]
    #[schema(example = 30.0)]
    pub taxa_conversao_meta: f64,
}

/// Números realizados de um mês + progresso percentual contra a meta.
///
/// Os campos `progresso_*` saem daqui sem teto; o clamp para exibição é feito
/// por [`MetaProgresso::limitado`] na borda HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetaProgresso {
    #[schema(example = 4)]
    pub leads_gerados: i64,

    #[schema(value_type = f64, example = 1500.50)]
    pub vendas_realizadas: Decimal,

    #[schema(example = 25.0)]
    pub conversao_real: f64,

    #[schema(example = 40.0)]
    pub progresso_leads: f64,
    pub progresso_vendas: f64,
    pub progresso_conversao: f64,
}

impl MetaProgresso {
    pub fn zerado() -> Self {
        Self {
            leads_gerados: 0,
            vendas_realizadas: Decimal::ZERO,
            conversao_real: 0.0,
            progresso_leads: 0.0,
            progresso_vendas: 0.0,
            progresso_conversao: 0.0,
        }
    }

    /// Versão para exibição: cada progresso limitado a [0, 100],
    /// independentemente dos outros.
    pub fn limitado(mut self) -> Self {
        self.progresso_leads = self.progresso_leads.clamp(0.0, 100.0);
        self.progresso_vendas = self.progresso_vendas.clamp(0.0, 100.0);
        self.progresso_conversao = self.progresso_conversao.clamp(0.0, 100.0);
        self
    }
}

/// Resposta de `GET /api/metas/progresso`: a meta cadastrada junto dos números
/// realizados do mês dela.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetaComProgresso {
    pub meta: Meta,
    pub progresso: MetaProgresso,
}
