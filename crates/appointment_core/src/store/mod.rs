//! Keyed appointment stores.
//!
//! # Responsibility
//! - Define one `AppointmentStore` contract for add/delete/list/size.
//! - Provide two interchangeable strategies: list-backed and map-backed.
//!
//! # Invariants
//! - At most one appointment per id is present at any time.
//! - Failed `add`/`delete` calls leave the store unchanged.
//! - `size()` always equals successful adds minus successful deletes.
//! - `list()` returns an owned snapshot, never a live view.
//! - Stores never mutate a record they hold; `replace` swaps whole records.

use crate::model::appointment::Appointment;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub mod list_store;
pub mod map_store;
pub mod shared;

pub use list_store::ListAppointmentStore;
pub use map_store::MapAppointmentStore;
pub use shared::{SharedAppointmentStore, SharedStoreError, SharedStoreResult};

pub type StoreResult<T> = Result<T, StoreError>;

/// Key-conflict failures raised by every store strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// `add` found an existing entry with the same id.
    DuplicateKey(String),
    /// `delete`/`replace` found no entry with the id.
    NotFound(String),
}

impl StoreError {
    /// The id the failed operation was keyed on.
    pub fn id(&self) -> &str {
        match self {
            Self::DuplicateKey(id) | Self::NotFound(id) => id,
        }
    }

    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateKey(_) => "duplicate_key",
            Self::NotFound(_) => "not_found",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey(id) => write!(f, "appointment with id `{id}` already exists"),
            Self::NotFound(id) => write!(
                f,
                "appointment `{id}` was already deleted or does not exist"
            ),
        }
    }
}

impl Error for StoreError {}

/// Storage strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    /// Ordered `Vec`; preserves insertion order, linear-time mutation.
    List,
    /// `HashMap` keyed by id; expected constant-time mutation, no ordering.
    Map,
}

impl StoreKind {
    pub const ALL: [StoreKind; 2] = [StoreKind::List, StoreKind::Map];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Map => "map",
        }
    }

    /// Parses a strategy name, accepting a few common aliases.
    pub fn parse(value: &str) -> Result<Self, StoreKindError> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "" => Err(StoreKindError::Empty),
            "list" | "array" | "vec" => Ok(Self::List),
            "map" | "hash" | "hashmap" => Ok(Self::Map),
            other => Err(StoreKindError::Unsupported(other.to_string())),
        }
    }
}

impl Display for StoreKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for StoreKind {
    type Err = StoreKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKindError {
    Empty,
    Unsupported(String),
}

impl Display for StoreKindError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "store kind must not be empty"),
            Self::Unsupported(value) => {
                write!(f, "unsupported store kind `{value}`; expected list|map")
            }
        }
    }
}

impl Error for StoreKindError {}

/// Common contract for keyed appointment collections.
pub trait AppointmentStore {
    fn kind(&self) -> StoreKind;

    /// Inserts `appointment` unless its id is already present.
    ///
    /// # Errors
    /// - `StoreError::DuplicateKey` when the id exists; nothing is inserted.
    fn add(&mut self, appointment: Appointment) -> StoreResult<()>;

    /// Removes and returns the entry for `id`.
    ///
    /// # Errors
    /// - `StoreError::NotFound` when no entry has that id.
    fn delete(&mut self, id: &str) -> StoreResult<Appointment>;

    /// Swaps the entry sharing `appointment.id()` for `appointment` in place
    /// and returns the previous record.
    ///
    /// # Errors
    /// - `StoreError::NotFound` when no entry has that id.
    fn replace(&mut self, appointment: Appointment) -> StoreResult<Appointment>;

    fn get(&self, id: &str) -> Option<&Appointment>;

    fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Point-in-time copy of all entries.
    fn list(&self) -> Vec<Appointment>;

    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

impl<S: AppointmentStore + ?Sized> AppointmentStore for Box<S> {
    fn kind(&self) -> StoreKind {
        (**self).kind()
    }

    fn add(&mut self, appointment: Appointment) -> StoreResult<()> {
        (**self).add(appointment)
    }

    fn delete(&mut self, id: &str) -> StoreResult<Appointment> {
        (**self).delete(id)
    }

    fn replace(&mut self, appointment: Appointment) -> StoreResult<Appointment> {
        (**self).replace(appointment)
    }

    fn get(&self, id: &str) -> Option<&Appointment> {
        (**self).get(id)
    }

    fn contains(&self, id: &str) -> bool {
        (**self).contains(id)
    }

    fn list(&self) -> Vec<Appointment> {
        (**self).list()
    }

    fn size(&self) -> usize {
        (**self).size()
    }
}

/// Creates an empty store for the requested strategy.
pub fn new_store(kind: StoreKind) -> Box<dyn AppointmentStore + Send> {
    match kind {
        StoreKind::List => Box::new(ListAppointmentStore::new()),
        StoreKind::Map => Box::new(MapAppointmentStore::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::{new_store, StoreError, StoreKind, StoreKindError};

    #[test]
    fn parses_store_kind_aliases() {
        assert_eq!(StoreKind::parse("LIST").expect("list parse"), StoreKind::List);
        assert_eq!(StoreKind::parse(" array ").expect("array parse"), StoreKind::List);
        assert_eq!(StoreKind::parse("hash").expect("hash parse"), StoreKind::Map);
        assert_eq!("map".parse::<StoreKind>().expect("map parse"), StoreKind::Map);
    }

    #[test]
    fn rejects_unknown_store_kind() {
        assert_eq!(StoreKind::parse("  "), Err(StoreKindError::Empty));
        assert_eq!(
            StoreKind::parse("tree"),
            Err(StoreKindError::Unsupported("tree".to_string()))
        );
    }

    #[test]
    fn new_store_honors_kind() {
        for kind in StoreKind::ALL {
            let store = new_store(kind);
            assert_eq!(store.kind(), kind);
            assert!(store.is_empty());
        }
    }

    #[test]
    fn store_error_messages_name_the_id() {
        let duplicate = StoreError::DuplicateKey("A1".to_string());
        assert_eq!(duplicate.to_string(), "appointment with id `A1` already exists");
        assert_eq!(duplicate.code(), "duplicate_key");

        let missing = StoreError::NotFound("A1".to_string());
        assert!(missing.to_string().contains("already deleted or does not exist"));
        assert_eq!(missing.id(), "A1");
    }
}
