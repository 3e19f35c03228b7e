pub mod user_repo;
pub use user_repo::UserRepository;
pub mod lead_repo;
pub use lead_repo::LeadRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;
pub mod meta_repo;
pub use meta_repo::MetaRepository;
