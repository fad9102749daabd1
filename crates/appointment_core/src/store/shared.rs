//! Thread-safe wrapper around a single store instance.
//!
//! # Responsibility
//! - Serialize add/delete/replace behind one exclusive lock per store.
//! - Take `list` snapshots under that same lock.
//!
//! # Invariants
//! - Uniqueness check and insert happen inside one critical section.
//! - `add` re-checks the date rule while holding the lock, so a record that
//!   went stale after construction is never inserted.
//! - A poisoned lock is reported as an error, never unwrapped.

use super::{AppointmentStore, StoreError};
use crate::model::appointment::{now_epoch_ms, Appointment, ValidationError};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard};

pub type SharedStoreResult<T> = Result<T, SharedStoreError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SharedStoreError {
    Validation(ValidationError),
    Store(StoreError),
    /// A previous holder panicked while the lock was held.
    Poisoned,
}

impl Display for SharedStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Poisoned => write!(f, "appointment store lock is poisoned"),
        }
    }
}

impl Error for SharedStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Poisoned => None,
        }
    }
}

impl From<ValidationError> for SharedStoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for SharedStoreError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Cloneable handle; every clone points at the same underlying store.
pub struct SharedAppointmentStore<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> Clone for SharedAppointmentStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: AppointmentStore> SharedAppointmentStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    pub fn add(&self, appointment: Appointment) -> SharedStoreResult<()> {
        let mut store = self.lock()?;
        // Clock is read after the lock is taken.
        appointment.ensure_upcoming_at(now_epoch_ms())?;
        store.add(appointment)?;
        Ok(())
    }

    /// Like `add`, but checks the date against an explicit `now_ms`.
    pub fn add_at(&self, appointment: Appointment, now_ms: i64) -> SharedStoreResult<()> {
        let mut store = self.lock()?;
        appointment.ensure_upcoming_at(now_ms)?;
        store.add(appointment)?;
        Ok(())
    }

    pub fn delete(&self, id: &str) -> SharedStoreResult<Appointment> {
        let mut store = self.lock()?;
        Ok(store.delete(id)?)
    }

    /// Swaps in `appointment` for the entry with the same id; the date is
    /// re-checked under the lock, as in `add`.
    pub fn replace(&self, appointment: Appointment) -> SharedStoreResult<Appointment> {
        let mut store = self.lock()?;
        appointment.ensure_upcoming_at(now_epoch_ms())?;
        Ok(store.replace(appointment)?)
    }

    pub fn replace_at(
        &self,
        appointment: Appointment,
        now_ms: i64,
    ) -> SharedStoreResult<Appointment> {
        let mut store = self.lock()?;
        appointment.ensure_upcoming_at(now_ms)?;
        Ok(store.replace(appointment)?)
    }

    pub fn get(&self, id: &str) -> SharedStoreResult<Option<Appointment>> {
        let store = self.lock()?;
        Ok(store.get(id).cloned())
    }

    pub fn list(&self) -> SharedStoreResult<Vec<Appointment>> {
        let store = self.lock()?;
        Ok(store.list())
    }

    pub fn size(&self) -> SharedStoreResult<usize> {
        let store = self.lock()?;
        Ok(store.size())
    }

    /// Runs `f` with exclusive access to the wrapped store.
    pub fn with_store<T>(&self, f: impl FnOnce(&mut S) -> T) -> SharedStoreResult<T> {
        let mut store = self.lock()?;
        Ok(f(&mut *store))
    }

    fn lock(&self) -> SharedStoreResult<MutexGuard<'_, S>> {
        self.inner.lock().map_err(|_| {
            warn!("event=store_lock module=store status=error error_code=lock_poisoned");
            SharedStoreError::Poisoned
        })
    }
}
