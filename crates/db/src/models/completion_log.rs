//! Completion log entity models.

use rota_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the append-only `completion_log` table. Created on every
/// complete/amend transition, never mutated.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CompletionLogEntry {
    pub id: DbId,
    pub task_instance_id: DbId,
    pub person_id: Option<DbId>,
    pub action: String,
    pub logged_at: Timestamp,
    pub message_ref: Option<i64>,
}
