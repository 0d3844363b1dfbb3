//! Task opt-out entity models.

use rota_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `task_opt_outs` table: a standing exemption for one
/// person from one task type. Never updated or removed in this version.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskOptOut {
    pub id: DbId,
    pub person_id: DbId,
    pub task_type_id: DbId,
    pub reason: String,
    pub created_at: Timestamp,
}

/// Opt-out row joined with the person and task names, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OptOutListing {
    pub task_name: String,
    pub person_name: String,
    pub reason: String,
}
