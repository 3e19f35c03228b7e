// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Local;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::dashboard::{DashboardResumo, FiltroDashboard},
    services::dashboard_service,
};

// GET /api/dashboard/resumo
//
// KPIs e agrupamentos dos gráficos, calculados sobre o snapshot atual da
// coleção. Uma leitura quebrada de configurações cai nos padrões embutidos em
// vez de derrubar o dashboard.
#[utoipa::path(
    get,
    path = "/api/dashboard/resumo",
    tag = "Dashboard",
    params(
        ("periodo" = Option<String>, Query, description = "all | thisMonth | thisYear"),
        ("responsavel" = Option<String>, Query, description = "Filtra por responsável; ignorado se não estiver na lista de configurações")
    ),
    responses((status = 200, description = "KPIs e agrupamentos para os gráficos", body = DashboardResumo)),
    security(("api_jwt" = []))
)]
pub async fn get_resumo(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(filtro): Query<FiltroDashboard>,
) -> Result<impl IntoResponse, AppError> {
    let leads = app_state.lead_service.list(user.id).await?;
    let settings = app_state.settings_service.get_or_default(user.id).await;

    let hoje = Local::now().date_naive();
    let resumo = dashboard_service::resumo(&leads, &settings, &filtro, hoje);

    Ok((StatusCode::OK, Json(resumo)))
}
