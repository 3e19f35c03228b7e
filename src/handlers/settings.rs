// src/handlers/settings.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{KeepAlive, Sse},
        IntoResponse,
    },
    Json,
};
use validator::Validate;

use crate::{
    common::{error::AppError, snapshots::stream_de_snapshots},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::settings::AppSettings,
};

// GET /api/settings
//
// Primeira leitura de um usuário novo cria o documento padrão e o devolve.
#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "Settings",
    responses((status = 200, description = "Listas de taxonomia do usuário", body = AppSettings)),
    security(("api_jwt" = []))
)]
pub async fn get_settings(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let settings = app_state.settings_service.get_or_bootstrap(user.id).await?;
    Ok((StatusCode::OK, Json(settings)))
}

// GET /api/settings/stream
#[utoipa::path(
    get,
    path = "/api/settings/stream",
    tag = "Settings",
    responses((status = 200, description = "Stream SSE de snapshots do documento")),
    security(("api_jwt" = []))
)]
pub async fn stream_settings(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let rx = app_state.settings_service.subscribe(user.id).await?;
    Ok(Sse::new(stream_de_snapshots(rx)).keep_alive(KeepAlive::default()))
}

// PUT /api/settings
//
// Substituição do documento inteiro, não um patch de listas individuais.
#[utoipa::path(
    put,
    path = "/api/settings",
    tag = "Settings",
    request_body = AppSettings,
    responses((status = 200, description = "Configurações salvas", body = AppSettings)),
    security(("api_jwt" = []))
)]
pub async fn replace_settings(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<AppSettings>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let salvo = app_state.settings_service.replace(user.id, payload).await?;
    Ok((StatusCode::OK, Json(salvo)))
}
