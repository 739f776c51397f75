//! Domain layer: models, the integrity pass and the services that compute
//! and mutate progress.

pub mod calendar;
pub mod commands;
pub mod dashboard_service;
pub mod dates;
pub mod errors;
pub mod export_service;
pub mod integrity;
pub mod models;
pub mod progress_service;
pub mod record_service;
pub mod settings_service;

pub use calendar::CalendarService;
pub use dashboard_service::DashboardService;
pub use errors::ProgressError;
pub use export_service::ExportService;
pub use progress_service::ProgressService;
pub use record_service::RecordService;
pub use settings_service::SettingsService;
