// src/services/lead_service.rs
//
// Fachada da coleção de leads: CRUD + assinatura de snapshots. A resposta de
// uma mutação é só sucesso/falha; o estado autoritativo chega pelo canal de
// snapshots, republicado depois de cada escrita.

use std::sync::Arc;

use tokio::sync::watch;
use uuid::Uuid;

use crate::{
    common::{
        error::{validacao_simples, AppError},
        snapshots::SnapshotHub,
    },
    db::LeadRepository,
    models::lead::{Lead, LeadPayload},
};

#[derive(Clone)]
pub struct LeadService {
    repo: LeadRepository,
    hub: Arc<SnapshotHub<Vec<Lead>>>,
}

impl LeadService {
    pub fn new(repo: LeadRepository) -> Self {
        Self {
            repo,
            hub: Arc::new(SnapshotHub::new()),
        }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Lead>, AppError> {
        self.repo.list_for_user(user_id).await
    }

    /// Assinatura de snapshots da coleção, semeada com o estado atual
    pub async fn subscribe(
        &self,
        user_id: Uuid,
    ) -> Result<watch::Receiver<Arc<Vec<Lead>>>, AppError> {
        let atual = self.repo.list_for_user(user_id).await?;
        Ok(self.hub.assinar(user_id, atual))
    }

    pub async fn create(&self, user_id: Uuid, payload: &LeadPayload) -> Result<Lead, AppError> {
        validar_valores(payload)?;
        let lead = self.repo.create(user_id, payload).await?;
        self.republicar(user_id).await;
        Ok(lead)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        payload: &LeadPayload,
    ) -> Result<Lead, AppError> {
        validar_valores(payload)?;
        let lead = self
            .repo
            .update(user_id, id, payload)
            .await?
            .ok_or(AppError::LeadNotFound)?;
        self.republicar(user_id).await;
        Ok(lead)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(user_id, id).await? {
            return Err(AppError::LeadNotFound);
        }
        self.republicar(user_id).await;
        Ok(())
    }

    /// Fecha o canal de snapshots do usuário (sign-out)
    pub fn encerrar_assinatura(&self, user_id: Uuid) {
        self.hub.encerrar(user_id);
    }

    async fn republicar(&self, user_id: Uuid) {
        // A escrita já foi confirmada; falha na releitura não desfaz a
        // mutação, só deixa o snapshot para a próxima publicação.
        match self.repo.list_for_user(user_id).await {
            Ok(lista) => self.hub.publicar(user_id, lista),
            Err(e) => tracing::warn!("Falha ao republicar snapshot de leads: {}", e),
        }
    }
}

fn validar_valores(payload: &LeadPayload) -> Result<(), AppError> {
    if let Some(valor) = payload.valor_venda {
        if valor.is_sign_negative() {
            return Err(validacao_simples(
                "valorVenda",
                "range",
                "O valor da venda não pode ser negativo.",
            ));
        }
    }
    Ok(())
}
