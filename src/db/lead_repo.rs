// src/db/lead_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::lead::{Lead, LeadPayload},
};

// Colunas devolvidas em toda consulta, na ordem do modelo
const COLUNAS_LEAD: &str = "id, nome, telefone, email, cidade, origem_lead, produto_interesse, \
     status_lead, temperatura, responsavel, data_entrada, proximo_contato, observacoes, \
     valor_venda, data_venda, motivo_perda, created_at";

#[derive(Clone)]
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Snapshot completo da coleção do usuário, em ordem estável
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Lead>, AppError> {
        let leads = sqlx::query_as::<_, Lead>(&format!(
            "SELECT {COLUNAS_LEAD} FROM leads WHERE user_id = $1 \
             ORDER BY data_entrada DESC, created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(leads)
    }

    pub async fn create(&self, user_id: Uuid, payload: &LeadPayload) -> Result<Lead, AppError> {
        let lead = sqlx::query_as::<_, Lead>(&format!(
            r#"
            INSERT INTO leads (
                user_id, nome, telefone, email, cidade,
                origem_lead, produto_interesse, status_lead, temperatura, responsavel,
                data_entrada, proximo_contato, observacoes,
                valor_venda, data_venda, motivo_perda
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {COLUNAS_LEAD}
            "#
        ))
        .bind(user_id)
        .bind(&payload.nome)
        .bind(&payload.telefone)
        .bind(&payload.email)
        .bind(&payload.cidade)
        .bind(&payload.origem_lead)
        .bind(&payload.produto_interesse)
        .bind(&payload.status_lead)
        .bind(&payload.temperatura)
        .bind(&payload.responsavel)
        .bind(payload.data_entrada)
        .bind(payload.proximo_contato)
        .bind(&payload.observacoes)
        .bind(payload.valor_venda)
        .bind(payload.data_venda)
        .bind(&payload.motivo_perda)
        .fetch_one(&self.pool)
        .await?;

        Ok(lead)
    }

    /// Substitui todos os campos editáveis. `None` = lead inexistente (ou de
    /// outro usuário), que o serviço converte em NotFound.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        payload: &LeadPayload,
    ) -> Result<Option<Lead>, AppError> {
        let lead = sqlx::query_as::<_, Lead>(&format!(
            r#"
            UPDATE leads SET
                nome = $3, telefone = $4, email = $5, cidade = $6,
                origem_lead = $7, produto_interesse = $8, status_lead = $9,
                temperatura = $10, responsavel = $11,
                data_entrada = $12, proximo_contato = $13, observacoes = $14,
                valor_venda = $15, data_venda = $16, motivo_perda = $17
            WHERE id = $1 AND user_id = $2
            RETURNING {COLUNAS_LEAD}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(&payload.nome)
        .bind(&payload.telefone)
        .bind(&payload.email)
        .bind(&payload.cidade)
        .bind(&payload.origem_lead)
        .bind(&payload.produto_interesse)
        .bind(&payload.status_lead)
        .bind(&payload.temperatura)
        .bind(&payload.responsavel)
        .bind(payload.data_entrada)
        .bind(payload.proximo_contato)
        .bind(&payload.observacoes)
        .bind(payload.valor_venda)
        .bind(payload.data_venda)
        .bind(&payload.motivo_perda)
        .fetch_optional(&self.pool)
        .await?;

        Ok(lead)
    }

    /// `false` = nada apagado (id inexistente ou de outro usuário)
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
