//! List-backed appointment store.
//!
//! # Responsibility
//! - Keep appointments in insertion order.
//!
//! # Invariants
//! - Uniqueness and deletion both scan the full sequence (O(n)).
//! - `add` appends; `delete` shifts later entries down.

use super::{AppointmentStore, StoreError, StoreKind, StoreResult};
use crate::model::appointment::Appointment;

/// Ordered `Vec` store. Suitable for small collections where chronological
/// insertion order matters more than mutation cost.
#[derive(Debug, Clone, Default)]
pub struct ListAppointmentStore {
    appointments: Vec<Appointment>,
}

impl ListAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            appointments: Vec::with_capacity(capacity),
        }
    }

    /// Borrowing iterator in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Appointment> {
        self.appointments.iter()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.appointments
            .iter()
            .position(|appointment| appointment.id().as_str() == id)
    }
}

impl AppointmentStore for ListAppointmentStore {
    fn kind(&self) -> StoreKind {
        StoreKind::List
    }

    fn add(&mut self, appointment: Appointment) -> StoreResult<()> {
        if self.position(appointment.id().as_str()).is_some() {
            return Err(StoreError::DuplicateKey(appointment.id().to_string()));
        }
        self.appointments.push(appointment);
        Ok(())
    }

    fn delete(&mut self, id: &str) -> StoreResult<Appointment> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(self.appointments.remove(index))
    }

    fn replace(&mut self, appointment: Appointment) -> StoreResult<Appointment> {
        let index = self
            .position(appointment.id().as_str())
            .ok_or_else(|| StoreError::NotFound(appointment.id().to_string()))?;
        Ok(std::mem::replace(&mut self.appointments[index], appointment))
    }

    fn get(&self, id: &str) -> Option<&Appointment> {
        self.appointments
            .iter()
            .find(|appointment| appointment.id().as_str() == id)
    }

    fn list(&self) -> Vec<Appointment> {
        self.appointments.clone()
    }

    fn size(&self) -> usize {
        self.appointments.len()
    }
}
