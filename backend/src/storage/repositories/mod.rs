//! Repositories encoding domain state into key-value blobs.

pub mod analysis_repository;
pub mod family_repository;
pub mod profile_repository;
pub mod record_repository;
pub mod settings_repository;

pub use analysis_repository::AnalysisRepository;
pub use family_repository::FamilyRepository;
pub use profile_repository::ProfileRepository;
pub use record_repository::RecordRepository;
pub use settings_repository::SettingsRepository;
