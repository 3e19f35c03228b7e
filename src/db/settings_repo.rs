// src/db/settings_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::settings::AppSettings};

const COLUNAS_SETTINGS: &str =
    "origem_lead, status_lead, produto_interesse, temperatura, motivo_perda, responsaveis";

#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, user_id: Uuid) -> Result<Option<AppSettings>, AppError> {
        let settings = sqlx::query_as::<_, AppSettings>(&format!(
            "SELECT {COLUNAS_SETTINGS} FROM hotleads_settings WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings)
    }

    /// Cria o documento padrão se ainda não existir e devolve o que ficou
    /// valendo. O ON CONFLICT deixa a criação preguiçosa atômica: duas
    /// primeiras leituras concorrentes convergem para o mesmo documento.
    pub async fn bootstrap_defaults(&self, user_id: Uuid) -> Result<AppSettings, AppError> {
        let padrao = AppSettings::default();

        sqlx::query(
            r#"
            INSERT INTO hotleads_settings (
                user_id, origem_lead, status_lead, produto_interesse,
                temperatura, motivo_perda, responsaveis
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(&padrao.origem_lead)
        .bind(&padrao.status_lead)
        .bind(&padrao.produto_interesse)
        .bind(&padrao.temperatura)
        .bind(&padrao.motivo_perda)
        .bind(&padrao.responsaveis)
        .execute(&self.pool)
        .await?;

        let settings = sqlx::query_as::<_, AppSettings>(&format!(
            "SELECT {COLUNAS_SETTINGS} FROM hotleads_settings WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(settings)
    }

    /// Substituição do documento inteiro (merge-replace do editor de
    /// configurações), nunca um patch parcial.
    pub async fn replace(
        &self,
        user_id: Uuid,
        novo: &AppSettings,
    ) -> Result<AppSettings, AppError> {
        let settings = sqlx::query_as::<_, AppSettings>(&format!(
            r#"
            INSERT INTO hotleads_settings (
                user_id, origem_lead, status_lead, produto_interesse,
                temperatura, motivo_perda, responsaveis
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id)
            DO UPDATE SET
                origem_lead = EXCLUDED.origem_lead,
                status_lead = EXCLUDED.status_lead,
                produto_interesse = EXCLUDED.produto_interesse,
                temperatura = EXCLUDED.temperatura,
                motivo_perda = EXCLUDED.motivo_perda,
                responsaveis = EXCLUDED.responsaveis,
                updated_at = NOW()
            RETURNING {COLUNAS_SETTINGS}
            "#
        ))
        .bind(user_id)
        .bind(&novo.origem_lead)
        .bind(&novo.status_lead)
        .bind(&novo.produto_interesse)
        .bind(&novo.temperatura)
        .bind(&novo.motivo_perda)
        .bind(&novo.responsaveis)
        .fetch_one(&self.pool)
        .await?;

        Ok(settings)
    }
}
