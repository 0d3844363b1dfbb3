//! Task instance entity models.

use rota_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::status::StatusId;

/// A row from the `task_instances` table: the per-week occurrence of a
/// task type, the unit of completion. Unique per (week, task type).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskInstance {
    pub id: DbId,
    pub week_id: DbId,
    pub task_type_id: DbId,
    pub status_id: StatusId,
    pub completed_by: Option<DbId>,
    pub completed_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// Instance joined with its task type, as consumed by the aggregator and
/// the selection-list queries.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InstanceWithTask {
    pub id: DbId,
    pub status_id: StatusId,
    pub completed_by: Option<DbId>,
    pub task_type_id: DbId,
    pub task_name: String,
    pub category: String,
    pub estimated_duration_minutes: Option<i32>,
}
