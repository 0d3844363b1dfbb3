//! Repository for the append-only `completion_log` table.

use rota_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::completion_log::CompletionLogEntry;
use crate::models::status::LogAction;

/// Column list for `completion_log` queries.
const COLUMNS: &str = "id, task_instance_id, person_id, action, logged_at, message_ref";

pub struct CompletionLogRepo;

impl CompletionLogRepo {
    pub async fn append<'e>(
        executor: impl PgExecutor<'e>,
        task_instance_id: DbId,
        person_id: DbId,
        action: LogAction,
        message_ref: Option<i64>,
    ) -> Result<CompletionLogEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO completion_log (task_instance_id, person_id, action, message_ref) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CompletionLogEntry>(&query)
            .bind(task_instance_id)
            .bind(person_id)
            .bind(action.as_str())
            .bind(message_ref)
            .fetch_one(executor)
            .await
    }

    /// History of an instance, oldest first.
    pub async fn list_for_instance<'e>(
        executor: impl PgExecutor<'e>,
        task_instance_id: DbId,
    ) -> Result<Vec<CompletionLogEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM completion_log \
             WHERE task_instance_id = $1 \
             ORDER BY id"
        );
        sqlx::query_as::<_, CompletionLogEntry>(&query)
            .bind(task_instance_id)
            .fetch_all(executor)
            .await
    }
}
