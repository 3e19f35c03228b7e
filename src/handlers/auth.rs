// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{
        AuthResponse, ConfirmPasswordResetPayload, LoginUserPayload, RegisterUserPayload,
        RequestPasswordResetPayload, User,
    },
};

// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Conta criada", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let token = app_state
        .auth_service
        .register_user(&payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token })))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Sessão iniciada", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let token = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await?;

    Ok((StatusCode::OK, Json(AuthResponse { token })))
}

// POST /api/auth/logout
//
// Fecha os três canais de snapshot do usuário: nenhum stream continua
// empurrando estado depois do sign-out. Um novo login assina do zero.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses((status = 204, description = "Sessão encerrada")),
    security(("api_jwt" = []))
)]
pub async fn logout(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> StatusCode {
    app_state.lead_service.encerrar_assinatura(user.id);
    app_state.settings_service.encerrar_assinatura(user.id);
    app_state.meta_service.encerrar_assinatura(user.id);

    tracing::info!(usuario = %user.id, "Sessão encerrada");
    StatusCode::NO_CONTENT
}

// POST /api/auth/reset-password
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    tag = "Auth",
    request_body = RequestPasswordResetPayload,
    responses(
        // Mesma resposta exista ou não o cadastro
        (status = 202, description = "Pedido registrado")
    )
)]
pub async fn request_password_reset(
    State(app_state): State<AppState>,
    Json(payload): Json<RequestPasswordResetPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state
        .auth_service
        .request_password_reset(&payload.email)
        .await?;

    Ok(StatusCode::ACCEPTED)
}

// POST /api/auth/reset-password/confirm
#[utoipa::path(
    post,
    path = "/api/auth/reset-password/confirm",
    tag = "Auth",
    request_body = ConfirmPasswordResetPayload,
    responses(
        (status = 204, description = "Senha redefinida"),
        (status = 400, description = "Token inválido ou expirado")
    )
)]
pub async fn confirm_password_reset(
    State(app_state): State<AppState>,
    Json(payload): Json<ConfirmPasswordResetPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state
        .auth_service
        .confirm_password_reset(payload.token, &payload.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses((status = 200, description = "Usuário autenticado", body = User)),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}
