//! Persistence adapters that mirror store contents into SQLite.
//!
//! # Responsibility
//! - Materialize `AppointmentStore::list()` snapshots as durable rows.
//! - Rebuild appointments from stored fields on load.
//!
//! # Invariants
//! - Loaded rows pass full model validation before reaching a store.
//! - Stores never learn about SQL; the repository only uses the store trait.

pub mod appointment_repo;
