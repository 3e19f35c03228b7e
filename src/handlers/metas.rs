// src/handlers/metas.rs

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
    models::meta::{Meta, MetaComProgresso, MetaPayload},
};

// GET /api/metas
#[utoipa::path(
    get,
    path = "/api/metas",
    tag = "Metas",
    responses((status = 200, description = "Metas cadastradas", body = Vec<Meta>)),
    security(("api_jwt" = []))
)]
pub async fn list_metas(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let metas = app_state.meta_service.list(user.id).await?;
    Ok((StatusCode::OK, Json(metas)))
}

// GET /api/metas/progresso
//
// Metas + números realizados do mês de cada uma, calculados sobre a coleção
// de leads no momento da chamada.
#[utoipa::path(
    get,
    path = "/api/metas/progresso",
    tag = "Metas",
    responses((status = 200, description = "Metas com progresso do mês", body = Vec<MetaComProgresso>)),
    security(("api_jwt" = []))
)]
pub async fn list_metas_com_progresso(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let metas = app_state.meta_service.list_com_progresso(user.id).await?;
    Ok((StatusCode::OK, Json(metas)))
}

// GET /api/metas/stream
#[utoipa::path(
    get,
    path = "/api/metas/stream",
    tag = "Metas",
    responses((status = 200, description = "Stream SSE de snapshots das metas")),
    security(("api_jwt" = []))
)]
pub async fn stream_metas(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let rx = app_state.meta_service.subscribe(user.id).await?;
    Ok(Sse::new(stream_de_snapshots(rx)).keep_alive(KeepAlive::default()))
}

// POST /api/metas
#[utoipa::path(
    post,
    path = "/api/metas",
    tag = "Metas",
    request_body = MetaPayload,
    responses(
        (status = 201, description = "Meta criada", body = Meta),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_meta(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<MetaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let meta = app_state.meta_service.create(user.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(meta)))
}

// PUT /api/metas/{id}
#[utoipa::path(
    put,
    path = "/api/metas/{id}",
    tag = "Metas",
    request_body = MetaPayload,
    params(("id" = Uuid, Path, description = "ID da meta")),
    responses(
        (status = 200, description = "Meta atualizada", body = Meta),
        (status = 404, description = "Meta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_meta(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MetaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let meta = app_state.meta_service.update(user.id, id, &payload).await?;
    Ok((StatusCode::OK, Json(meta)))
}

// DELETE /api/metas/{id}
#[utoipa::path(
    delete,
    path = "/api/metas/{id}",
    tag = "Metas",
    params(("id" = Uuid, Path, description = "ID da meta")),
    responses(
        (status = 204, description = "Meta excluída"),
        (status = 404, description = "Meta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_meta(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.meta_service.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
