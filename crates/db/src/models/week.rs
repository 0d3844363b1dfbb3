//! Week entity models.

use rota_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `weeks` table. `(year, week_number)` is unique; at most
/// one row is open (`closed = false`) at steady state, and `closed` flips
/// true exactly once, during rollover.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Week {
    pub id: DbId,
    pub year: i32,
    pub week_number: i32,
    pub start_at: Timestamp,
    pub deadline: Timestamp,
    pub closed: bool,
    pub created_at: Timestamp,
}
