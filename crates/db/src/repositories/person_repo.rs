//! Repository for the `people` table.

use rota_core::types::{DbId, ExternalId};
use sqlx::{PgExecutor, PgPool};

use crate::models::person::{Person, RegisterPerson};

/// Column list for `people` queries.
const COLUMNS: &str = "id, external_id, name, username, active, joined_at";

pub struct PersonRepo;

impl PersonRepo {
    /// Register a person if the external id is unseen. Returns the row and
    /// whether it was newly created. Safe under concurrent registration:
    /// the insert is `ON CONFLICT DO NOTHING` against the unique
    /// constraint, and the follow-up read resolves the winner's row.
    pub async fn register_if_missing(
        pool: &PgPool,
        input: &RegisterPerson,
    ) -> Result<(Person, bool), sqlx::Error> {
        let query = format!(
            "INSERT INTO people (external_id, name, username) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (external_id) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Person>(&query)
            .bind(input.external_id)
            .bind(&input.name)
            .bind(&input.username)
            .fetch_optional(pool)
            .await?;

        match inserted {
            Some(person) => Ok((person, true)),
            None => {
                let existing = Self::find_by_external_id(pool, input.external_id)
                    .await?
                    .ok_or(sqlx::Error::RowNotFound)?;
                Ok((existing, false))
            }
        }
    }

    pub async fn find_by_external_id<'e>(
        executor: impl PgExecutor<'e>,
        external_id: ExternalId,
    ) -> Result<Option<Person>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM people WHERE external_id = $1");
        sqlx::query_as::<_, Person>(&query)
            .bind(external_id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Person>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM people WHERE id = $1");
        sqlx::query_as::<_, Person>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Active people in registration order (the aggregator preserves this
    /// order for the not-contributed listing).
    pub async fn list_active<'e>(
        executor: impl PgExecutor<'e>,
    ) -> Result<Vec<Person>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM people WHERE active ORDER BY id");
        sqlx::query_as::<_, Person>(&query).fetch_all(executor).await
    }
}
