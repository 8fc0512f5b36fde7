//! # Domain Layer
//!
//! Business logic for the baby tracker. Services are cheap `Clone` handles
//! over shared state and are constructed once per application session.
//!
//! - [`RecordService`]: care records, their queries and daily statistics
//! - [`ProfileService`]: the single baby profile
//! - [`SettingsService`]: notification preferences
//! - [`AnalysisService`]: development analysis, quota and cache
//! - [`ExportService`]: CSV export
//! - [`FamilyService`]: caregivers the records are shared with
//! - [`ChangeNotifier`]: change events for observers

pub mod analysis_provider;
pub mod analysis_service;
pub mod commands;
pub mod export_service;
pub mod family_service;
pub mod models;
pub mod notifications;
pub mod profile_service;
pub mod record_service;
pub mod settings_service;
pub mod statistics;

pub use analysis_provider::{AnalysisProvider, SimulatedAnalysisProvider};
pub use analysis_service::{AnalysisLimits, AnalysisService};
pub use export_service::ExportService;
pub use family_service::FamilyService;
pub use notifications::{ChangeEvent, ChangeKind, ChangeNotifier};
pub use profile_service::ProfileService;
pub use record_service::RecordService;
pub use settings_service::SettingsService;
