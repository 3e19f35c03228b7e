// src/services/settings_service.rs

use std::sync::Arc;

use tokio::sync::watch;
use uuid::Uuid;

use crate::{
    common::{error::AppError, snapshots::SnapshotHub},
    db::SettingsRepository,
    models::settings::AppSettings,
};

#[derive(Clone)]
pub struct SettingsService {
    repo: SettingsRepository,
    hub: Arc<SnapshotHub<AppSettings>>,
}

impl SettingsService {
    pub fn new(repo: SettingsRepository) -> Self {
        Self {
            repo,
            hub: Arc::new(SnapshotHub::new()),
        }
    }

    /// Primeira leitura de um usuário novo cria o documento padrão
    /// atomicamente e o devolve.
    pub async fn get_or_bootstrap(&self, user_id: Uuid) -> Result<AppSettings, AppError> {
        match self.repo.get(user_id).await? {
            Some(settings) => Ok(settings),
            None => self.repo.bootstrap_defaults(user_id).await,
        }
    }

    /// Variante que nunca falha, para o dashboard: uma leitura quebrada cai
    /// nos padrões embutidos em vez de deixar a tela indefinida.
    pub async fn get_or_default(&self, user_id: Uuid) -> AppSettings {
        match self.get_or_bootstrap(user_id).await {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Falha ao ler configurações, usando padrões: {}", e);
                AppSettings::default()
            }
        }
    }

    pub async fn subscribe(
        &self,
        user_id: Uuid,
    ) -> Result<watch::Receiver<Arc<AppSettings>>, AppError> {
        let atual = self.get_or_bootstrap(user_id).await?;
        Ok(self.hub.assinar(user_id, atual))
    }

    /// Merge-replace do documento inteiro vindo do editor de configurações
    pub async fn replace(
        &self,
        user_id: Uuid,
        novo: AppSettings,
    ) -> Result<AppSettings, AppError> {
        let salvo = self.repo.replace(user_id, &novo).await?;
        self.hub.publicar(user_id, salvo.clone());
        Ok(salvo)
    }

    pub fn encerrar_assinatura(&self, user_id: Uuid) {
        self.hub.encerrar(user_id);
    }
}
