//! Domain model for scheduled appointments.
//!
//! # Responsibility
//! - Define the appointment record and its field validation contract.
//! - Keep construction fallible so invalid records never exist.
//!
//! # Invariants
//! - Every appointment is identified by a caller-visible `AppointmentId`.
//! - Store strategies depend on the model only through its accessors.

pub mod appointment;
