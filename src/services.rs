pub mod auth;
pub mod dashboard_service;
pub mod lead_service;
pub mod meta_service;
pub mod settings_service;
