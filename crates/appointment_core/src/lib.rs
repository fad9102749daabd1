//! Core appointment record management.
//! This crate is the single source of truth for appointment invariants.

pub mod compare;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use compare::{
    compare_strategies, replay, ComparisonPlan, ComparisonReport, ReplayOutcome, StoreOp,
    StrategyTiming,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::appointment::{
    now_epoch_ms, Appointment, AppointmentDraft, AppointmentId, ValidationError,
    MAX_DESCRIPTION_LEN, MAX_ID_LEN,
};
pub use repo::appointment_repo::{
    AppointmentRow, LoadReport, RepoError, RepoResult, SqliteAppointmentRepository,
};
pub use service::appointment_service::{AppointmentService, ServiceError, ServiceResult};
pub use store::{
    new_store, AppointmentStore, ListAppointmentStore, MapAppointmentStore,
    SharedAppointmentStore, SharedStoreError, SharedStoreResult, StoreError, StoreKind,
    StoreKindError, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
