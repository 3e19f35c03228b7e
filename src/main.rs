// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/reset-password", post(handlers::auth::request_password_reset))
        .route(
            "/reset-password/confirm",
            post(handlers::auth::confirm_password_reset),
        );

    // O logout é protegido: precisa saber de quem encerrar as assinaturas
    let logout_route = Router::new()
        .route("/logout", post(handlers::auth::logout))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let lead_routes = Router::new()
        .route(
            "/",
            post(handlers::leads::create_lead).get(handlers::leads::list_leads),
        )
        .route("/stream", get(handlers::leads::stream_leads))
        .route(
            "/{id}",
            put(handlers::leads::update_lead).delete(handlers::leads::delete_lead),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let settings_routes = Router::new()
        .route(
            "/",
            get(handlers::settings::get_settings).put(handlers::settings::replace_settings),
        )
        .route("/stream", get(handlers::settings::stream_settings))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let meta_routes = Router::new()
        .route(
            "/",
            post(handlers::metas::create_meta).get(handlers::metas::list_metas),
        )
        .route("/progresso", get(handlers::metas::list_metas_com_progresso))
        .route("/stream", get(handlers::metas::stream_metas))
        .route(
            "/{id}",
            put(handlers::metas::update_meta).delete(handlers::metas::delete_meta),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let dashboard_routes = Router::new()
        .route("/resumo", get(handlers::dashboard::get_resumo))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes.merge(logout_route))
        .nest("/api/users", user_routes)
        .nest("/api/leads", lead_routes)
        .nest("/api/settings", settings_routes)
        .nest("/api/metas", meta_routes)
        .nest("/api/dashboard", dashboard_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
