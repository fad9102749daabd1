//! Appointment domain model.
//!
//! # Responsibility
//! - Define the canonical appointment record held by every store strategy.
//! - Validate id/date/description before a record is allowed to exist.
//!
//! # Invariants
//! - A constructed `Appointment` satisfies every field rule for its lifetime.
//! - Validation runs in the order id -> date -> description; the first
//!   violated rule is the one reported.
//! - `id` never changes after construction; it is the store key.
//! - Dates are Unix epoch milliseconds and must be strictly after "now".

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Maximum id length, in characters.
pub const MAX_ID_LEN: usize = 10;
/// Maximum description length, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 50;

static ID_CHARSET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("valid id regex"));

/// Returns the current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}

/// Field-level validation failure for appointment input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    IdRequired,
    IdInvalidCharacters,
    IdTooLong { len: usize },
    DateRequired,
    DateNotInFuture { date: i64, now: i64 },
    DescriptionRequired,
    DescriptionTooLong { len: usize },
}

impl ValidationError {
    /// Name of the field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            Self::IdRequired | Self::IdInvalidCharacters | Self::IdTooLong { .. } => "id",
            Self::DateRequired | Self::DateNotInFuture { .. } => "date",
            Self::DescriptionRequired | Self::DescriptionTooLong { .. } => "description",
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IdRequired => write!(f, "id required"),
            Self::IdInvalidCharacters => write!(f, "id has invalid characters"),
            Self::IdTooLong { len } => {
                write!(f, "id must be at most {MAX_ID_LEN} characters, got {len}")
            }
            Self::DateRequired => write!(f, "date required"),
            Self::DateNotInFuture { .. } => write!(f, "date must be in the future"),
            Self::DescriptionRequired => write!(f, "description required"),
            Self::DescriptionTooLong { len } => write!(
                f,
                "description must be at most {MAX_DESCRIPTION_LEN} characters, got {len}"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Validated appointment key: 1..=10 ASCII letters or digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AppointmentId(String);

impl AppointmentId {
    /// Parses and validates a caller-provided id.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        validate_id(&value)?;
        Ok(Self(value))
    }

    /// Generates a fresh id from a random v4 UUID.
    ///
    /// Hex digits are a subset of the allowed charset, so the truncated
    /// simple form is always valid. Uniqueness inside a store is still
    /// enforced by the store itself.
    pub fn generate() -> Self {
        let mut value = Uuid::new_v4().simple().to_string();
        value.truncate(MAX_ID_LEN);
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for AppointmentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for AppointmentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets hash-indexed stores look up by `&str` without allocating.
impl Borrow<str> for AppointmentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AppointmentId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<AppointmentId> for String {
    fn from(value: AppointmentId) -> Self {
        value.0
    }
}

/// Unvalidated appointment candidate.
///
/// Built by callers (UI forms, persistence loaders, deserializers) where any
/// field may still be missing. `validate` is the only way to turn a draft
/// into an `Appointment`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentDraft {
    pub id: Option<String>,
    /// Unix epoch milliseconds.
    pub date: Option<i64>,
    pub description: Option<String>,
}

impl AppointmentDraft {
    /// Creates a draft with every field present.
    pub fn new(id: impl Into<String>, date: i64, description: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            date: Some(date),
            description: Some(description.into()),
        }
    }

    /// Validates the draft against the current wall clock.
    pub fn validate(self) -> Result<Appointment, ValidationError> {
        self.validate_at(now_epoch_ms())
    }

    /// Validates the draft against an explicit `now_ms`.
    ///
    /// # Errors
    /// - Returns the first violated rule, in id -> date -> description order.
    pub fn validate_at(self, now_ms: i64) -> Result<Appointment, ValidationError> {
        let id = AppointmentId::parse(self.id.ok_or(ValidationError::IdRequired)?)?;
        let date = self.date.ok_or(ValidationError::DateRequired)?;
        validate_date(date, now_ms)?;
        let description = self
            .description
            .ok_or(ValidationError::DescriptionRequired)?;
        Appointment::with_id_at(id, date, description, now_ms)
    }
}

/// Canonical appointment record.
///
/// Fields are private; every mutation path goes through a validating setter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AppointmentDraft")]
pub struct Appointment {
    id: AppointmentId,
    /// Unix epoch milliseconds.
    date: i64,
    description: String,
}

impl Appointment {
    /// Creates an appointment validated against the current wall clock.
    pub fn new(
        id: impl Into<String>,
        date: i64,
        description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::new_at(id, date, description, now_epoch_ms())
    }

    /// Creates an appointment validated against an explicit `now_ms`.
    pub fn new_at(
        id: impl Into<String>,
        date: i64,
        description: impl Into<String>,
        now_ms: i64,
    ) -> Result<Self, ValidationError> {
        let id = AppointmentId::parse(id)?;
        Self::with_id_at(id, date, description, now_ms)
    }

    /// Creates an appointment from an already validated id.
    pub fn with_id(
        id: AppointmentId,
        date: i64,
        description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::with_id_at(id, date, description, now_epoch_ms())
    }

    pub fn with_id_at(
        id: AppointmentId,
        date: i64,
        description: impl Into<String>,
        now_ms: i64,
    ) -> Result<Self, ValidationError> {
        validate_date(date, now_ms)?;
        let description = description.into();
        validate_description(&description)?;
        Ok(Self {
            id,
            date,
            description,
        })
    }

    pub fn id(&self) -> &AppointmentId {
        &self.id
    }

    /// Scheduled time in Unix epoch milliseconds.
    pub fn date(&self) -> i64 {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Replaces the date; the record is unchanged on failure.
    pub fn set_date(&mut self, date: i64) -> Result<(), ValidationError> {
        self.set_date_at(date, now_epoch_ms())
    }

    pub fn set_date_at(&mut self, date: i64, now_ms: i64) -> Result<(), ValidationError> {
        validate_date(date, now_ms)?;
        self.date = date;
        Ok(())
    }

    /// Replaces the description; the record is unchanged on failure.
    pub fn set_description(
        &mut self,
        description: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let description = description.into();
        validate_description(&description)?;
        self.description = description;
        Ok(())
    }

    /// Re-checks the date rule against `now_ms`.
    ///
    /// A record that was valid when built can go stale before it reaches a
    /// store; insertion paths that care call this under their own lock.
    pub fn ensure_upcoming_at(&self, now_ms: i64) -> Result<(), ValidationError> {
        validate_date(self.date, now_ms)
    }
}

impl TryFrom<AppointmentDraft> for Appointment {
    type Error = ValidationError;

    fn try_from(value: AppointmentDraft) -> Result<Self, Self::Error> {
        value.validate()
    }
}

fn validate_id(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::IdRequired);
    }
    if !ID_CHARSET_RE.is_match(value) {
        return Err(ValidationError::IdInvalidCharacters);
    }
    // Charset is ASCII-only past this point, so bytes == chars.
    if value.len() > MAX_ID_LEN {
        return Err(ValidationError::IdTooLong { len: value.len() });
    }
    Ok(())
}

fn validate_date(date: i64, now_ms: i64) -> Result<(), ValidationError> {
    if date <= now_ms {
        return Err(ValidationError::DateNotInFuture { date, now: now_ms });
    }
    Ok(())
}

fn validate_description(value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::DescriptionTooLong { len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        validate_description, validate_id, AppointmentId, ValidationError, MAX_ID_LEN,
    };

    #[test]
    fn validate_id_checks_charset_before_length() {
        assert_eq!(
            validate_id("bad id with spaces!"),
            Err(ValidationError::IdInvalidCharacters)
        );
        assert_eq!(
            validate_id("ABCDEFGHIJK"),
            Err(ValidationError::IdTooLong { len: 11 })
        );
        assert_eq!(validate_id(""), Err(ValidationError::IdRequired));
    }

    #[test]
    fn validate_id_rejects_non_ascii_letters() {
        assert_eq!(validate_id("caf\u{e9}"), Err(ValidationError::IdInvalidCharacters));
    }

    #[test]
    fn description_length_counts_chars_not_bytes() {
        let accented = "\u{e9}".repeat(50);
        assert!(accented.len() > 50);
        assert_eq!(validate_description(&accented), Ok(()));
    }

    #[test]
    fn generated_ids_are_valid() {
        for _ in 0..32 {
            let id = AppointmentId::generate();
            assert_eq!(id.as_str().len(), MAX_ID_LEN);
            assert_eq!(validate_id(id.as_str()), Ok(()));
        }
    }

    #[test]
    fn error_reports_field_name() {
        assert_eq!(ValidationError::IdRequired.field(), "id");
        assert_eq!(
            ValidationError::DateNotInFuture { date: 1, now: 2 }.field(),
            "date"
        );
        assert_eq!(
            ValidationError::DescriptionTooLong { len: 51 }.field(),
            "description"
        );
    }
}
