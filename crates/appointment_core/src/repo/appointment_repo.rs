//! Appointment snapshot repository over SQLite.
//!
//! # Responsibility
//! - Replace the persisted snapshot with the current store contents.
//! - Load persisted rows back into any store strategy.
//!
//! # Invariants
//! - `save_snapshot` is all-or-nothing (single transaction).
//! - Row `position` preserves `list()` order, so list-backed stores reload
//!   in their original insertion order.
//! - Rows that no longer validate (typically dates now in the past) are
//!   skipped and counted, never inserted.

use crate::db::DbError;
use crate::model::appointment::{now_epoch_ms, Appointment, AppointmentDraft, ValidationError};
use crate::store::AppointmentStore;
use log::{info, warn};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Raw persisted row, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentRow {
    pub id: String,
    pub date_ms: i64,
    pub description: String,
}

impl AppointmentRow {
    pub fn into_draft(self) -> AppointmentDraft {
        AppointmentDraft::new(self.id, self.date_ms, self.description)
    }
}

/// Per-load accounting returned by `load_into`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Rows added to the target store.
    pub loaded: usize,
    /// Rows whose date is no longer in the future.
    pub expired: usize,
    /// Rows failing any other field rule.
    pub invalid: usize,
    /// Rows whose id was already present in the target store.
    pub conflicting: usize,
}

/// SQLite-backed snapshot repository.
pub struct SqliteAppointmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAppointmentRepository<'conn> {
    /// The connection must come from `db::open_db*` so migrations are applied.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Replaces every persisted row with `appointments`, in order.
    pub fn save_snapshot(&self, appointments: &[Appointment]) -> RepoResult<usize> {
        let saved_at = now_epoch_ms();
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM appointments;", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO appointments (id, position, date_ms, description, saved_at)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
            )?;
            for (position, appointment) in appointments.iter().enumerate() {
                stmt.execute(params![
                    appointment.id().as_str(),
                    i64::try_from(position).unwrap_or(i64::MAX),
                    appointment.date(),
                    appointment.description(),
                    saved_at,
                ])?;
            }
        }
        tx.commit()?;

        info!(
            "event=snapshot_save module=repo status=ok rows={}",
            appointments.len()
        );
        Ok(appointments.len())
    }

    /// Convenience wrapper saving `store.list()`.
    pub fn save_store<S: AppointmentStore + ?Sized>(&self, store: &S) -> RepoResult<usize> {
        self.save_snapshot(&store.list())
    }

    /// Returns persisted rows in snapshot order without validating them.
    pub fn load_rows(&self) -> RepoResult<Vec<AppointmentRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date_ms, description
             FROM appointments
             ORDER BY position ASC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_row(row)?);
        }
        Ok(items)
    }

    pub fn count_rows(&self) -> RepoResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM appointments;", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Validates each persisted row against the wall clock and adds it.
    pub fn load_into<S: AppointmentStore + ?Sized>(
        &self,
        store: &mut S,
    ) -> RepoResult<LoadReport> {
        self.load_into_at(store, now_epoch_ms())
    }

    pub fn load_into_at<S: AppointmentStore + ?Sized>(
        &self,
        store: &mut S,
        now_ms: i64,
    ) -> RepoResult<LoadReport> {
        let mut report = LoadReport::default();
        for row in self.load_rows()? {
            match row.into_draft().validate_at(now_ms) {
                Ok(appointment) => match store.add(appointment) {
                    Ok(()) => report.loaded += 1,
                    Err(err) => {
                        warn!(
                            "event=snapshot_load module=repo status=skip reason={} id={}",
                            err.code(),
                            err.id()
                        );
                        report.conflicting += 1;
                    }
                },
                Err(ValidationError::DateNotInFuture { .. }) => report.expired += 1,
                Err(err) => {
                    warn!(
                        "event=snapshot_load module=repo status=skip reason=invalid field={}",
                        err.field()
                    );
                    report.invalid += 1;
                }
            }
        }

        info!(
            "event=snapshot_load module=repo status=ok store={} loaded={} expired={} invalid={} conflicting={}",
            store.kind(),
            report.loaded,
            report.expired,
            report.invalid,
            report.conflicting
        );
        Ok(report)
    }
}

fn parse_row(row: &Row<'_>) -> RepoResult<AppointmentRow> {
    Ok(AppointmentRow {
        id: row.get("id")?,
        date_ms: row.get("date_ms")?,
        description: row.get("description")?,
    })
}
