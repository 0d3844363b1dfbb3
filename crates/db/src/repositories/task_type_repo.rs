//! Repository for the `task_types` table (the read-mostly catalog).

use rota_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::task_type::{CreateTaskType, TaskType};

/// Column list for `task_types` queries.
const COLUMNS: &str = "id, name, category, description, instructions, frequency, \
     estimated_duration_minutes, location, created_at";

pub struct TaskTypeRepo;

impl TaskTypeRepo {
    pub async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateTaskType,
    ) -> Result<TaskType, sqlx::Error> {
        let query = format!(
            "INSERT INTO task_types \
                 (name, category, description, instructions, \
                  estimated_duration_minutes, location) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaskType>(&query)
            .bind(input.name)
            .bind(input.category)
            .bind(input.description)
            .bind(input.instructions)
            .bind(input.estimated_duration_minutes)
            .bind(input.location)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<TaskType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM task_types WHERE id = $1");
        sqlx::query_as::<_, TaskType>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_name<'e>(
        executor: impl PgExecutor<'e>,
        name: &str,
    ) -> Result<Option<TaskType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM task_types WHERE name = $1");
        sqlx::query_as::<_, TaskType>(&query)
            .bind(name)
            .fetch_optional(executor)
            .await
    }

    /// The whole catalog, ordered by category then name, which is the
    /// order the catalog listing presents.
    pub async fn list_all<'e>(
        executor: impl PgExecutor<'e>,
    ) -> Result<Vec<TaskType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM task_types ORDER BY category, name");
        sqlx::query_as::<_, TaskType>(&query)
            .fetch_all(executor)
            .await
    }

    pub async fn count<'e>(executor: impl PgExecutor<'e>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM task_types")
            .fetch_one(executor)
            .await
    }
}
