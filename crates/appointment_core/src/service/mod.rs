//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and store calls into use-case level APIs.
//! - Keep UI/persistence callers decoupled from the storage strategy.

pub mod appointment_service;
