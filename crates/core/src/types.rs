/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Chat-platform user identifier. Opaque to the core; unique per person.
pub type ExternalId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
