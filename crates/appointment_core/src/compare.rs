//! Cross-strategy replay and timing comparison.
//!
//! # Responsibility
//! - Replay one operation script against any store strategy.
//! - Time an add-N / delete-M workload on every strategy and check that
//!   they end in the same observable state.
//!
//! # Invariants
//! - Replays never stop on a failed operation; every outcome is recorded.
//! - Equivalence compares outcomes, size and id sets, never iteration order.

use crate::model::appointment::{now_epoch_ms, Appointment, AppointmentId, ValidationError};
use crate::service::appointment_service::ServiceResult;
use crate::store::{new_store, AppointmentStore, StoreError, StoreKind};
use log::info;
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// One scripted store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Add(Appointment),
    Delete(String),
}

/// Observable result of replaying a script on one strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOutcome {
    pub kind: StoreKind,
    pub results: Vec<Result<(), StoreError>>,
    pub size: usize,
    pub ids: BTreeSet<String>,
}

impl ReplayOutcome {
    /// Same per-op outcomes, same size and same membership.
    pub fn is_equivalent_to(&self, other: &ReplayOutcome) -> bool {
        self.results == other.results && self.size == other.size && self.ids == other.ids
    }
}

/// Replays `ops` against an empty store of `kind`.
pub fn replay(kind: StoreKind, ops: &[StoreOp]) -> ReplayOutcome {
    let mut store = new_store(kind);
    let results = ops
        .iter()
        .map(|op| match op {
            StoreOp::Add(appointment) => store.add(appointment.clone()),
            StoreOp::Delete(id) => store.delete(id).map(|_| ()),
        })
        .collect();

    ReplayOutcome {
        kind,
        results,
        size: store.size(),
        ids: store
            .list()
            .iter()
            .map(|appointment| appointment.id().to_string())
            .collect(),
    }
}

/// Workload shape for `compare_strategies`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonPlan {
    /// Appointments added, with ids `ID0..ID{add_count-1}`.
    pub add_count: usize,
    /// Appointments deleted afterwards, starting from `ID0`.
    pub delete_count: usize,
}

impl Default for ComparisonPlan {
    fn default() -> Self {
        Self {
            add_count: 1000,
            delete_count: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyTiming {
    pub kind: StoreKind,
    pub add_elapsed: Duration,
    pub delete_elapsed: Duration,
    pub final_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonReport {
    pub plan: ComparisonPlan,
    pub timings: Vec<StrategyTiming>,
    /// Whether every strategy ended with the same id set.
    pub equivalent: bool,
}

/// Runs `plan` on every strategy, one after another.
///
/// # Errors
/// - `ServiceError::Validation` when the plan needs ids longer than allowed,
///   or when `now_ms` leaves no room for a future date.
/// - `ServiceError::Store` when `delete_count > add_count`.
pub fn compare_strategies(plan: &ComparisonPlan) -> ServiceResult<ComparisonReport> {
    compare_strategies_at(plan, now_epoch_ms())
}

pub fn compare_strategies_at(
    plan: &ComparisonPlan,
    now_ms: i64,
) -> ServiceResult<ComparisonReport> {
    let date = now_ms
        .checked_add(DAY_MS)
        .ok_or(ValidationError::DateNotInFuture {
            date: i64::MAX,
            now: now_ms,
        })?;
    let mut appointments = Vec::with_capacity(plan.add_count);
    for index in 0..plan.add_count {
        let id = AppointmentId::parse(format!("ID{index}"))?;
        appointments.push(Appointment::with_id_at(
            id,
            date,
            format!("Description {index}"),
            now_ms,
        )?);
    }

    let mut timings = Vec::with_capacity(StoreKind::ALL.len());
    let mut id_sets = Vec::with_capacity(StoreKind::ALL.len());
    for kind in StoreKind::ALL {
        let mut store = new_store(kind);

        let started_at = Instant::now();
        for appointment in &appointments {
            store.add(appointment.clone())?;
        }
        let add_elapsed = started_at.elapsed();

        let started_at = Instant::now();
        for appointment in appointments.iter().take(plan.delete_count) {
            store.delete(appointment.id().as_str())?;
        }
        if plan.delete_count > appointments.len() {
            store.delete(&format!("ID{}", appointments.len()))?;
        }
        let delete_elapsed = started_at.elapsed();

        info!(
            "event=strategy_compare module=compare status=ok store={} adds={} deletes={} add_us={} delete_us={}",
            kind,
            plan.add_count,
            plan.delete_count,
            add_elapsed.as_micros(),
            delete_elapsed.as_micros()
        );

        id_sets.push(
            store
                .list()
                .iter()
                .map(|appointment| appointment.id().to_string())
                .collect::<BTreeSet<_>>(),
        );
        timings.push(StrategyTiming {
            kind,
            add_elapsed,
            delete_elapsed,
            final_size: store.size(),
        });
    }

    let equivalent = id_sets.windows(2).all(|pair| pair[0] == pair[1]);
    Ok(ComparisonReport {
        plan: *plan,
        timings,
        equivalent,
    })
}
