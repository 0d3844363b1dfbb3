//! Repository for the `weeks` table.

use rota_core::timekeeping::{IsoWeek, WeekWindow};
use rota_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::week::Week;

/// Column list for `weeks` queries.
const COLUMNS: &str = "id, year, week_number, start_at, deadline, closed, created_at";

pub struct WeekRepo;

impl WeekRepo {
    pub async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        iso: IsoWeek,
        window: WeekWindow,
    ) -> Result<Week, sqlx::Error> {
        let query = format!(
            "INSERT INTO weeks (year, week_number, start_at, deadline) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Week>(&query)
            .bind(iso.year)
            .bind(iso.week)
            .bind(window.start)
            .bind(window.deadline)
            .fetch_one(executor)
            .await
    }

    /// Insert the week unless its (year, week) identity already exists.
    /// Returns `None` when another writer won the race; the caller
    /// re-reads by identity.
    pub async fn insert_if_absent<'e>(
        executor: impl PgExecutor<'e>,
        iso: IsoWeek,
        window: WeekWindow,
    ) -> Result<Option<Week>, sqlx::Error> {
        let query = format!(
            "INSERT INTO weeks (year, week_number, start_at, deadline) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (year, week_number) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Week>(&query)
            .bind(iso.year)
            .bind(iso.week)
            .bind(window.start)
            .bind(window.deadline)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Week>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM weeks WHERE id = $1");
        sqlx::query_as::<_, Week>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_iso_week<'e>(
        executor: impl PgExecutor<'e>,
        iso: IsoWeek,
    ) -> Result<Option<Week>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM weeks WHERE year = $1 AND week_number = $2");
        sqlx::query_as::<_, Week>(&query)
            .bind(iso.year)
            .bind(iso.week)
            .fetch_optional(executor)
            .await
    }

    /// The open week. When more than one row is open (should not happen at
    /// steady state), the one with the latest deadline wins.
    pub async fn find_open<'e>(
        executor: impl PgExecutor<'e>,
    ) -> Result<Option<Week>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM weeks \
             WHERE NOT closed \
             ORDER BY deadline DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, Week>(&query).fetch_optional(executor).await
    }

    /// Close a week. Guarded so `closed` flips true at most once; returns
    /// whether this call was the one that closed it.
    pub async fn close<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE weeks SET closed = TRUE WHERE id = $1 AND NOT closed")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
