//! Task type (catalog) entity models.

use rota_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `task_types` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskType {
    pub id: DbId,
    pub name: String,
    pub category: String,
    pub description: String,
    pub instructions: String,
    pub frequency: String,
    pub estimated_duration_minutes: Option<i32>,
    pub location: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for catalog seeding.
#[derive(Debug, Clone)]
pub struct CreateTaskType {
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub instructions: &'static str,
    pub estimated_duration_minutes: Option<i32>,
    pub location: Option<&'static str>,
}
