//! Repository for the `task_opt_outs` table.

use rota_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::opt_out::{OptOutListing, TaskOptOut};

/// Column list for `task_opt_outs` queries.
const COLUMNS: &str = "id, person_id, task_type_id, reason, created_at";

pub struct OptOutRepo;

impl OptOutRepo {
    pub async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        person_id: DbId,
        task_type_id: DbId,
        reason: &str,
    ) -> Result<TaskOptOut, sqlx::Error> {
        let query = format!(
            "INSERT INTO task_opt_outs (person_id, task_type_id, reason) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaskOptOut>(&query)
            .bind(person_id)
            .bind(task_type_id)
            .bind(reason)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_person_task<'e>(
        executor: impl PgExecutor<'e>,
        person_id: DbId,
        task_type_id: DbId,
    ) -> Result<Option<TaskOptOut>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM task_opt_outs \
             WHERE person_id = $1 AND task_type_id = $2"
        );
        sqlx::query_as::<_, TaskOptOut>(&query)
            .bind(person_id)
            .bind(task_type_id)
            .fetch_optional(executor)
            .await
    }

    /// All opt-outs with person and task names resolved, sorted by task
    /// name then person name. `task_filter` is a case-insensitive literal
    /// substring filter on the task name; `%` and `_` in it are plain
    /// characters, not LIKE wildcards.
    pub async fn list_detailed<'e>(
        executor: impl PgExecutor<'e>,
        task_filter: Option<&str>,
    ) -> Result<Vec<OptOutListing>, sqlx::Error> {
        sqlx::query_as::<_, OptOutListing>(
            "SELECT t.name AS task_name, p.name AS person_name, o.reason \
             FROM task_opt_outs o \
             JOIN task_types t ON t.id = o.task_type_id \
             JOIN people p ON p.id = o.person_id \
             WHERE $1::TEXT IS NULL OR position(lower($1) IN lower(t.name)) > 0 \
             ORDER BY t.name, p.name",
        )
        .bind(task_filter)
        .fetch_all(executor)
        .await
    }

    /// Names of the task types a person has opted out of, sorted.
    pub async fn task_names_for_person<'e>(
        executor: impl PgExecutor<'e>,
        person_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT t.name FROM task_opt_outs o \
             JOIN task_types t ON t.id = o.task_type_id \
             WHERE o.person_id = $1 \
             ORDER BY t.name",
        )
        .bind(person_id)
        .fetch_all(executor)
        .await
    }
}
