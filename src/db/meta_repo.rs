// src/db/meta_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::meta::{Meta, MetaPayload},
};

const COLUNAS_META: &str = "id, mes_ano, meta_leads, meta_vendas, taxa_conversao_meta, created_at";

#[derive(Clone)]
pub struct MetaRepository {
    pool: PgPool,
}

impl MetaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Meta>, AppError> {
        let metas = sqlx::query_as::<_, Meta>(&format!(
            "SELECT {COLUNAS_META} FROM metas WHERE user_id = $1 ORDER BY mes_ano DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(metas)
    }

    pub async fn create(&self, user_id: Uuid, payload: &MetaPayload) -> Result<Meta, AppError> {
        let meta = sqlx::query_as::<_, Meta>(&format!(
            r#"
            INSERT INTO metas (user_id, mes_ano, meta_leads, meta_vendas, taxa_conversao_meta)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUNAS_META}
            "#
        ))
        .bind(user_id)
        .bind(&payload.mes_ano)
        .bind(payload.meta_leads)
        .bind(payload.meta_vendas)
        .bind(payload.taxa_conversao_meta)
        .fetch_one(&self.pool)
        .await?;

        Ok(meta)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        payload: &MetaPayload,
    ) -> Result<Option<Meta>, AppError> {
        let meta = sqlx::query_as::<_, Meta>(&format!(
            r#"
            UPDATE metas SET
                mes_ano = $3, meta_leads = $4, meta_vendas = $5, taxa_conversao_meta = $6
            WHERE id = $1 AND user_id = $2
            RETURNING {COLUNAS_META}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(&payload.mes_ano)
        .bind(payload.meta_leads)
        .bind(payload.meta_vendas)
        .bind(payload.taxa_conversao_meta)
        .fetch_optional(&self.pool)
        .await?;

        Ok(meta)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM metas WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
