// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String) -> Self {
        Self {
            user_repo,
            jwt_secret,
        }
    }

    pub async fn register_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        // O hashing é pesado; roda fora do executor async
        let password_clone = password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let new_user = self.user_repo.create_user(email, &hashed_password).await?;

        tracing::info!(usuario = %new_user.id, "Novo usuário registrado");
        self.create_token(new_user.id)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    /// Gera um token de redefinição de uso único. A entrega do e-mail é do
    /// provedor externo; aqui o token só é registrado no log. A resposta é
    /// idêntica para e-mails desconhecidos.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AppError> {
        let Some(user) = self.user_repo.find_by_email(email).await? else {
            tracing::info!("Pedido de redefinição para e-mail não cadastrado");
            return Ok(());
        };

        let expires_at = Utc::now() + chrono::Duration::hours(2);
        let token = self
            .user_repo
            .create_password_reset(user.id, expires_at)
            .await?;

        tracing::info!(usuario = %user.id, token = %token, "Token de redefinição de senha gerado");
        Ok(())
    }

    pub async fn confirm_password_reset(
        &self,
        token: Uuid,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user_id = self
            .user_repo
            .consume_password_reset(token)
            .await?
            .ok_or(AppError::ResetTokenInvalid)?;

        let password_clone = new_password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.user_repo
            .update_password(user_id, &hashed_password)
            .await?;

        tracing::info!(usuario = %user_id, "Senha redefinida");
        Ok(())
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
