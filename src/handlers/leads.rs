// src/handlers/leads.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{KeepAlive, Sse},
        IntoResponse,
    },
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, snapshots::stream_de_snapshots},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::lead::{Lead, LeadPayload},
};

// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    responses((status = 200, description = "Coleção de leads do usuário", body = Vec<Lead>)),
    security(("api_jwt" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let leads = app_state.lead_service.list(user.id).await?;
    Ok((StatusCode::OK, Json(leads)))
}

// GET /api/leads/stream
//
// Assinatura da coleção: um evento SSE por snapshot, começando pelo estado
// atual. Fecha quando a sessão é encerrada.
#[utoipa::path(
    get,
    path = "/api/leads/stream",
    tag = "Leads",
    responses((status = 200, description = "Stream SSE de snapshots da coleção")),
    security(("api_jwt" = []))
)]
pub async fn stream_leads(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let rx = app_state.lead_service.subscribe(user.id).await?;
    Ok(Sse::new(stream_de_snapshots(rx)).keep_alive(KeepAlive::default()))
}

// POST /api/leads
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "Leads",
    request_body = LeadPayload,
    responses(
        (status = 201, description = "Lead criado", body = Lead),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<LeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let lead = app_state.lead_service.create(user.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}

// PUT /api/leads/{id}
#[utoipa::path(
    put,
    path = "/api/leads/{id}",
    tag = "Leads",
    request_body = LeadPayload,
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead atualizado", body = Lead),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_lead(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<LeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let lead = app_state.lead_service.update(user.id, id, &payload).await?;
    Ok((StatusCode::OK, Json(lead)))
}

// DELETE /api/leads/{id}
#[utoipa::path(
    delete,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 204, description = "Lead excluído"),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_lead(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.lead_service.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
