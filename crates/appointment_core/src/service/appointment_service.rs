//! Appointment use-case service.
//!
//! # Responsibility
//! - Provide schedule/cancel/reschedule entry points for core callers.
//! - Turn drafts into validated appointments before they reach a store.
//! - Emit metadata-only log events for every mutation.
//!
//! # Invariants
//! - Service APIs never bypass model validation or store uniqueness checks.
//! - A failed call leaves the store unchanged.
//! - Error messages are passed through verbatim for display.

use crate::model::appointment::{
    now_epoch_ms, Appointment, AppointmentDraft, AppointmentId, ValidationError,
};
use crate::store::{AppointmentStore, StoreError, StoreKind};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Attempts made to find a free generated id before giving up.
const MAX_GENERATED_ID_ATTEMPTS: usize = 4;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    Validation(ValidationError),
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Use-case facade over any store strategy.
pub struct AppointmentService<S: AppointmentStore> {
    store: S,
}

impl<S: AppointmentStore> AppointmentService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn kind(&self) -> StoreKind {
        self.store.kind()
    }

    /// Validates `draft` and adds the resulting appointment.
    pub fn schedule(&mut self, draft: AppointmentDraft) -> ServiceResult<Appointment> {
        self.schedule_at(draft, now_epoch_ms())
    }

    pub fn schedule_at(
        &mut self,
        draft: AppointmentDraft,
        now_ms: i64,
    ) -> ServiceResult<Appointment> {
        let appointment = draft.validate_at(now_ms).inspect_err(|err| {
            warn!(
                "event=appointment_validate module=service status=error field={} error={}",
                err.field(),
                err
            );
        })?;
        self.add(appointment.clone())?;
        Ok(appointment)
    }

    /// Schedules an appointment under a freshly generated id.
    ///
    /// Collisions with existing ids are retried with a new id; `add` still
    /// never overwrites.
    pub fn schedule_with_generated_id(
        &mut self,
        date: i64,
        description: impl Into<String>,
    ) -> ServiceResult<Appointment> {
        self.schedule_with_generated_id_at(date, description, now_epoch_ms())
    }

    pub fn schedule_with_generated_id_at(
        &mut self,
        date: i64,
        description: impl Into<String>,
        now_ms: i64,
    ) -> ServiceResult<Appointment> {
        let description = description.into();
        let mut attempts = 0;
        loop {
            attempts += 1;
            let appointment = Appointment::with_id_at(
                AppointmentId::generate(),
                date,
                description.as_str(),
                now_ms,
            )?;
            match self.add(appointment.clone()) {
                Ok(()) => return Ok(appointment),
                Err(ServiceError::Store(StoreError::DuplicateKey(_)))
                    if attempts < MAX_GENERATED_ID_ATTEMPTS => {}
                Err(err) => return Err(err),
            }
        }
    }

    /// Adds an already validated appointment.
    pub fn add(&mut self, appointment: Appointment) -> ServiceResult<()> {
        let id = appointment.id().clone();
        match self.store.add(appointment) {
            Ok(()) => {
                info!(
                    "event=appointment_add module=service status=ok store={} id={} size={}",
                    self.store.kind(),
                    id,
                    self.store.size()
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=appointment_add module=service status=error store={} id={} error_code={}",
                    self.store.kind(),
                    id,
                    err.code()
                );
                Err(err.into())
            }
        }
    }

    /// Removes the appointment with `id` and returns it.
    pub fn cancel(&mut self, id: &str) -> ServiceResult<Appointment> {
        match self.store.delete(id) {
            Ok(removed) => {
                info!(
                    "event=appointment_delete module=service status=ok store={} id={} size={}",
                    self.store.kind(),
                    id,
                    self.store.size()
                );
                Ok(removed)
            }
            Err(err) => {
                warn!(
                    "event=appointment_delete module=service status=error store={} error_code={}",
                    self.store.kind(),
                    err.code()
                );
                Err(err.into())
            }
        }
    }

    /// Moves an appointment to `new_date`.
    pub fn reschedule(&mut self, id: &str, new_date: i64) -> ServiceResult<Appointment> {
        self.reschedule_at(id, new_date, now_epoch_ms())
    }

    pub fn reschedule_at(
        &mut self,
        id: &str,
        new_date: i64,
        now_ms: i64,
    ) -> ServiceResult<Appointment> {
        let mut updated = self.current(id)?;
        updated.set_date_at(new_date, now_ms)?;
        self.store.replace(updated.clone())?;
        info!(
            "event=appointment_reschedule module=service status=ok store={} id={}",
            self.store.kind(),
            id
        );
        Ok(updated)
    }

    /// Replaces an appointment's description.
    pub fn describe(
        &mut self,
        id: &str,
        description: impl Into<String>,
    ) -> ServiceResult<Appointment> {
        let mut updated = self.current(id)?;
        updated.set_description(description)?;
        self.store.replace(updated.clone())?;
        info!(
            "event=appointment_describe module=service status=ok store={} id={}",
            self.store.kind(),
            id
        );
        Ok(updated)
    }

    pub fn get(&self, id: &str) -> Option<&Appointment> {
        self.store.get(id)
    }

    pub fn list(&self) -> Vec<Appointment> {
        self.store.list()
    }

    pub fn count(&self) -> usize {
        self.store.size()
    }

    fn current(&self, id: &str) -> ServiceResult<Appointment> {
        self.store
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()).into())
    }
}
