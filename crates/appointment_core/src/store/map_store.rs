//! Map-backed appointment store.
//!
//! # Responsibility
//! - Index appointments by id for expected constant-time add/get/delete.
//!
//! # Invariants
//! - The map key always equals the stored record's id.
//! - Iteration order is unspecified and must not be relied upon.

use super::{AppointmentStore, StoreError, StoreKind, StoreResult};
use crate::model::appointment::{Appointment, AppointmentId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Hash-indexed store for larger collections where mutation throughput
/// matters more than ordering.
#[derive(Debug, Clone, Default)]
pub struct MapAppointmentStore {
    appointments: HashMap<AppointmentId, Appointment>,
}

impl MapAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            appointments: HashMap::with_capacity(capacity),
        }
    }
}

impl AppointmentStore for MapAppointmentStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Map
    }

    fn add(&mut self, appointment: Appointment) -> StoreResult<()> {
        match self.appointments.entry(appointment.id().clone()) {
            Entry::Occupied(existing) => Err(StoreError::DuplicateKey(existing.key().to_string())),
            Entry::Vacant(slot) => {
                slot.insert(appointment);
                Ok(())
            }
        }
    }

    fn delete(&mut self, id: &str) -> StoreResult<Appointment> {
        self.appointments
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn replace(&mut self, appointment: Appointment) -> StoreResult<Appointment> {
        match self.appointments.get_mut(appointment.id().as_str()) {
            Some(slot) => Ok(std::mem::replace(slot, appointment)),
            None => Err(StoreError::NotFound(appointment.id().to_string())),
        }
    }

    fn get(&self, id: &str) -> Option<&Appointment> {
        self.appointments.get(id)
    }

    fn contains(&self, id: &str) -> bool {
        self.appointments.contains_key(id)
    }

    fn list(&self) -> Vec<Appointment> {
        self.appointments.values().cloned().collect()
    }

    fn size(&self) -> usize {
        self.appointments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::MapAppointmentStore;
    use crate::model::appointment::Appointment;
    use crate::store::{AppointmentStore, StoreError};

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn duplicate_add_keeps_original_record() {
        let mut store = MapAppointmentStore::with_capacity(4);
        let first = Appointment::new_at("A1", NOW + 1, "first", NOW).expect("valid");
        let second = Appointment::new_at("A1", NOW + 2, "second", NOW).expect("valid");

        store.add(first).expect("first add");
        let err = store.add(second).expect_err("duplicate must fail");

        assert_eq!(err, StoreError::DuplicateKey("A1".to_string()));
        assert_eq!(store.get("A1").map(Appointment::description), Some("first"));
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn replace_missing_id_is_not_found() {
        let mut store = MapAppointmentStore::new();
        let candidate = Appointment::new_at("Z9", NOW + 1, "ghost", NOW).expect("valid");

        let err = store.replace(candidate).expect_err("replace must fail");
        assert_eq!(err, StoreError::NotFound("Z9".to_string()));
        assert!(store.is_empty());
    }
}
