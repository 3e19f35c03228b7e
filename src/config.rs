// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{LeadRepository, MetaRepository, SettingsRepository, UserRepository},
    services::{
        auth::AuthService, lead_service::LeadService, meta_service::MetaService,
        settings_service::SettingsService,
    },
};

// Estado compartilhado da aplicação: montado uma vez no boot e injetado nos
// handlers, em vez de um cliente global mutável.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub lead_service: LeadService,
    pub settings_service: SettingsService,
    pub meta_service: MetaService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let lead_repo = LeadRepository::new(db_pool.clone());
        let settings_repo = SettingsRepository::new(db_pool.clone());
        let meta_repo = MetaRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret);
        let lead_service = LeadService::new(lead_repo.clone());
        let settings_service = SettingsService::new(settings_repo);
        let meta_service = MetaService::new(meta_repo, lead_repo);

        Ok(Self {
            db_pool,
            auth_service,
            lead_service,
            settings_service,
            meta_service,
        })
    }
}
