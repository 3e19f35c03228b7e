// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Janela de tempo do dashboard, avaliada contra a data de entrada de cada
/// lead no calendário local.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PeriodoFiltro {
    #[default]
    #[serde(rename = "all")]
    Todos,
    #[serde(rename = "thisMonth")]
    EsteMes,
    #[serde(rename = "thisYear")]
    EsteAno,
}

/// Filtros aceitos por `GET /api/dashboard/resumo`. Um responsável que não
/// está na lista de configurações é ignorado, não filtra nada.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FiltroDashboard {
    #[serde(default)]
    pub periodo: PeriodoFiltro,
    pub responsavel: Option<String>,
}

/// Uma fatia de gráfico: rótulo canônico + contagem. Entradas com contagem
/// zero nunca aparecem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartEntry {
    #[schema(example = "Qualificado")]
    pub name: String,
    #[schema(example = 7)]
    pub value: i64,
}

/// KPIs + agrupamentos prontos para os gráficos (funil por status, pizza por
/// origem, barras por produto), todos derivados da lista filtrada.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResumo {
    #[schema(example = 42)]
    pub total_leads: i64,

    #[schema(example = 30)]
    pub leads_ativos: i64,

    #[schema(example = 25.0)]
    pub taxa_conversao: f64,

    #[schema(value_type = f64, example = 15000.0)]
    pub valor_total_vendido: Decimal,

    pub leads_por_status: Vec<ChartEntry>,
    pub leads_por_origem: Vec<ChartEntry>,
    pub leads_por_produto: Vec<ChartEntry>,
}
