// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::request_password_reset,
        handlers::auth::confirm_password_reset,

        // --- Users ---
        handlers::auth::get_me,

        // --- Leads ---
        handlers::leads::list_leads,
        handlers::leads::stream_leads,
        handlers::leads::create_lead,
        handlers::leads::update_lead,
        handlers::leads::delete_lead,

        // --- Settings ---
        handlers::settings::get_settings,
        handlers::settings::stream_settings,
        handlers::settings::replace_settings,

        // --- Metas ---
        handlers::metas::list_metas,
        handlers::metas::list_metas_com_progresso,
        handlers::metas::stream_metas,
        handlers::metas::create_meta,
        handlers::metas::update_meta,
        handlers::metas::delete_meta,

        // --- Dashboard ---
        handlers::dashboard::get_resumo,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::RequestPasswordResetPayload,
            models::auth::ConfirmPasswordResetPayload,
            models::auth::AuthResponse,

            // --- Leads ---
            models::lead::Lead,
            models::lead::LeadPayload,

            // --- Settings ---
            models::settings::AppSettings,

            // --- Metas ---
            models::meta::Meta,
            models::meta::MetaPayload,
            models::meta::MetaProgresso,
            models::meta::MetaComProgresso,

            // --- Dashboard ---
            models::dashboard::PeriodoFiltro,
            models::dashboard::FiltroDashboard,
            models::dashboard::ChartEntry,
            models::dashboard::DashboardResumo,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário"),
        (name = "Leads", description = "Gestão de Leads do Funil"),
        (name = "Settings", description = "Listas de Taxonomia (Origens, Status, Produtos...)"),
        (name = "Metas", description = "Metas Mensais e Progresso"),
        (name = "Dashboard", description = "Indicadores e Gráficos")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
