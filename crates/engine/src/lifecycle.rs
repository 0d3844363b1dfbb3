//! Week lifecycle: `none → open → closed`.
//!
//! Seeding and rollover each run as ONE transaction, so a crash can never
//! leave a week closed without its successor ensured, and concurrent
//! callers land on the store's uniqueness constraints instead of
//! duplicating rows.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use rota_core::timekeeping::{iso_week_of, week_window_of};
use rota_core::{CategoryTargets, DomainError};
use rota_db::models::week::Week;
use rota_db::repositories::{TaskInstanceRepo, TaskTypeRepo, WeekRepo};

use crate::error::EngineResult;
use crate::status::{week_snapshot, WeekSnapshot};

/// Result of `ensure_active_week`.
#[derive(Debug, Clone)]
pub struct EnsuredWeek {
    pub week: Week,
    pub week_created: bool,
    pub created_instances: u64,
    pub total_task_types: i64,
}

/// Result of `check_and_rollover`.
#[derive(Debug, Clone)]
pub enum Rollover {
    /// No open week existed; one was ensured. No summary to report.
    Started { ensured: EnsuredWeek },
    /// The open week's deadline has not passed.
    NotDue,
    /// The open week was closed and its successor ensured.
    RolledOver {
        snapshot: WeekSnapshot,
        ensured: EnsuredWeek,
    },
}

/// Find-or-create the week for `now`'s ISO identity and seed one pending
/// instance per task type. Idempotent: a second call in the same ISO week
/// returns the same week and reports zero created instances.
pub async fn ensure_active_week(pool: &PgPool, now: DateTime<Utc>) -> EngineResult<EnsuredWeek> {
    let mut tx = pool.begin().await?;
    let ensured = ensure_active_week_in(&mut tx, now).await?;
    tx.commit().await?;
    Ok(ensured)
}

/// Transaction body of [`ensure_active_week`], shared with rollover.
async fn ensure_active_week_in(
    conn: &mut PgConnection,
    now: DateTime<Utc>,
) -> EngineResult<EnsuredWeek> {
    let iso = iso_week_of(now);
    let window = week_window_of(now);

    let (week, week_created) = match WeekRepo::find_by_iso_week(&mut *conn, iso).await? {
        Some(week) => (week, false),
        None => match WeekRepo::insert_if_absent(&mut *conn, iso, window).await? {
            Some(week) => (week, true),
            // Lost the identity race; the winner's row must exist.
            None => (
                WeekRepo::find_by_iso_week(&mut *conn, iso)
                    .await?
                    .ok_or(DomainError::MissingWeek)?,
                false,
            ),
        },
    };

    let created_instances = TaskInstanceRepo::seed_for_week(&mut *conn, week.id).await?;
    let total_task_types = TaskTypeRepo::count(&mut *conn).await?;

    if week_created {
        tracing::info!(
            year = week.year,
            week = week.week_number,
            created_instances,
            "Opened new week"
        );
    }

    Ok(EnsuredWeek {
        week,
        week_created,
        created_instances,
        total_task_types,
    })
}

/// Tick-driven rollover check.
///
/// - no open week → ensure one, report it started;
/// - open week before its deadline → no-op;
/// - otherwise snapshot the week, close it, and ensure the current ISO
///   week, all in one transaction.
pub async fn check_and_rollover(
    pool: &PgPool,
    targets: &CategoryTargets,
    now: DateTime<Utc>,
) -> EngineResult<Rollover> {
    let mut tx = pool.begin().await?;

    let Some(active) = WeekRepo::find_open(&mut *tx).await? else {
        let ensured = ensure_active_week_in(&mut tx, now).await?;
        tx.commit().await?;
        return Ok(Rollover::Started { ensured });
    };

    if now < active.deadline {
        return Ok(Rollover::NotDue);
    }

    let snapshot = week_snapshot(&mut tx, targets, active.id)
        .await?
        .ok_or(DomainError::MissingSnapshot)?;

    WeekRepo::close(&mut *tx, active.id).await?;
    let ensured = ensure_active_week_in(&mut tx, now).await?;
    tx.commit().await?;

    tracing::info!(
        year = snapshot.week.year,
        week = snapshot.week.week_number,
        completed = snapshot.completed_count,
        remaining = snapshot.remaining,
        "Week rolled over"
    );

    Ok(Rollover::RolledOver { snapshot, ensured })
}
