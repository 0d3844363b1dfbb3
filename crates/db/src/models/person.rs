//! Person entity models.

use rota_core::types::{DbId, ExternalId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `people` table. People are never hard-deleted; the
/// `active` flag is toggled instead.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Person {
    pub id: DbId,
    pub external_id: ExternalId,
    pub name: String,
    pub username: Option<String>,
    pub active: bool,
    pub joined_at: Timestamp,
}

/// DTO for register-if-missing.
#[derive(Debug, Clone)]
pub struct RegisterPerson {
    pub external_id: ExternalId,
    pub name: String,
    pub username: Option<String>,
}
