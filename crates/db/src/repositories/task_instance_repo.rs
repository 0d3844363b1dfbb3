//! Repository for the `task_instances` table.
//!
//! The pending⇄completed transitions are guarded UPDATEs: they succeed
//! only when the row is still in the expected pre-state, so two racing
//! actors resolve to exactly one winner at the store.

use rota_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::status::InstanceStatus;
use crate::models::task_instance::{InstanceWithTask, TaskInstance};

/// Column list for `task_instances` queries.
const COLUMNS: &str =
    "id, week_id, task_type_id, status_id, completed_by, completed_at, notes, created_at";

pub struct TaskInstanceRepo;

impl TaskInstanceRepo {
    /// Seed one pending instance per task type for a week, skipping pairs
    /// that already exist. Returns the number of newly created rows.
    /// Idempotent: the insert lands on the (week, task type) unique
    /// constraint.
    pub async fn seed_for_week<'e>(
        executor: impl PgExecutor<'e>,
        week_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO task_instances (week_id, task_type_id, status_id) \
             SELECT $1, id, $2 FROM task_types \
             ON CONFLICT (week_id, task_type_id) DO NOTHING",
        )
        .bind(week_id)
        .bind(InstanceStatus::Pending.id())
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<TaskInstance>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM task_instances WHERE id = $1");
        sqlx::query_as::<_, TaskInstance>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Fetch an instance with a row lock, for use inside a transaction
    /// that reads eligibility before transitioning.
    pub async fn lock_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<TaskInstance>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM task_instances WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, TaskInstance>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// pending → completed. Succeeds only if the row is still pending;
    /// returns whether this call won the transition.
    pub async fn mark_completed<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        person_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE task_instances \
             SET status_id = $2, completed_by = $3, completed_at = NOW() \
             WHERE id = $1 AND status_id = $4",
        )
        .bind(id)
        .bind(InstanceStatus::Completed.id())
        .bind(person_id)
        .bind(InstanceStatus::Pending.id())
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// completed → pending, clearing completer and timestamp. Succeeds
    /// only if the row is still completed.
    pub async fn mark_pending<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE task_instances \
             SET status_id = $2, completed_by = NULL, completed_at = NULL \
             WHERE id = $1 AND status_id = $3",
        )
        .bind(id)
        .bind(InstanceStatus::Pending.id())
        .bind(InstanceStatus::Completed.id())
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Every instance of a week joined with its task type, ordered by task
    /// name for stable selection lists.
    pub async fn list_with_tasks<'e>(
        executor: impl PgExecutor<'e>,
        week_id: DbId,
    ) -> Result<Vec<InstanceWithTask>, sqlx::Error> {
        sqlx::query_as::<_, InstanceWithTask>(
            "SELECT i.id, i.status_id, i.completed_by, i.task_type_id, \
                    t.name AS task_name, t.category, t.estimated_duration_minutes \
             FROM task_instances i \
             JOIN task_types t ON t.id = i.task_type_id \
             WHERE i.week_id = $1 \
             ORDER BY t.name",
        )
        .bind(week_id)
        .fetch_all(executor)
        .await
    }

    /// Completed task names with the completer's name (left join: the
    /// completer reference may be absent), ordered by task name.
    pub async fn completed_with_names<'e>(
        executor: impl PgExecutor<'e>,
        week_id: DbId,
    ) -> Result<Vec<(String, Option<String>)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT t.name, p.name \
             FROM task_instances i \
             JOIN task_types t ON t.id = i.task_type_id \
             LEFT JOIN people p ON p.id = i.completed_by \
             WHERE i.week_id = $1 AND i.status_id = $2 \
             ORDER BY t.name",
        )
        .bind(week_id)
        .bind(InstanceStatus::Completed.id())
        .fetch_all(executor)
        .await
    }

    /// Per-person completed counts for a week, largest first (name breaks
    /// ties for determinism).
    pub async fn contributions<'e>(
        executor: impl PgExecutor<'e>,
        week_id: DbId,
    ) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT p.name, COUNT(*) \
             FROM task_instances i \
             JOIN people p ON p.id = i.completed_by \
             WHERE i.week_id = $1 AND i.status_id = $2 \
             GROUP BY p.name \
             ORDER BY COUNT(*) DESC, p.name",
        )
        .bind(week_id)
        .bind(InstanceStatus::Completed.id())
        .fetch_all(executor)
        .await
    }

    pub async fn count_completed<'e>(
        executor: impl PgExecutor<'e>,
        week_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM task_instances WHERE week_id = $1 AND status_id = $2",
        )
        .bind(week_id)
        .bind(InstanceStatus::Completed.id())
        .fetch_one(executor)
        .await
    }

    /// How many instances of a week a person has completed.
    pub async fn count_completed_by<'e>(
        executor: impl PgExecutor<'e>,
        week_id: DbId,
        person_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM task_instances \
             WHERE week_id = $1 AND completed_by = $2",
        )
        .bind(week_id)
        .bind(person_id)
        .fetch_one(executor)
        .await
    }

    /// A person's all-time completion count across every week.
    pub async fn count_all_time_by<'e>(
        executor: impl PgExecutor<'e>,
        person_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM task_instances WHERE completed_by = $1")
            .bind(person_id)
            .fetch_one(executor)
            .await
    }

    /// Names of the tasks a person completed in a week, sorted.
    pub async fn completed_task_names<'e>(
        executor: impl PgExecutor<'e>,
        week_id: DbId,
        person_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT t.name FROM task_instances i \
             JOIN task_types t ON t.id = i.task_type_id \
             WHERE i.week_id = $1 AND i.completed_by = $2 \
             ORDER BY t.name",
        )
        .bind(week_id)
        .bind(person_id)
        .fetch_all(executor)
        .await
    }
}
