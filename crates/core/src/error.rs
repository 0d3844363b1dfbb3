//! Domain-level error taxonomy.
//!
//! Every variant is an expected condition a caller renders into a user
//! message, never an infrastructure fault. Each carries just enough
//! context for that rendering (the conflicting task name, the stored
//! opt-out reason, the echoed query).

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("person is not registered")]
    NotRegistered,

    /// The task instance is missing or not in the expected pre-state for
    /// the requested transition. A racer that loses a complete/amend race
    /// observes the post-transition state and gets this.
    #[error("task instance is missing or not in the expected state")]
    InvalidTask,

    #[error("no task matches query {query:?}")]
    TaskNotFound { query: String },

    #[error("query {query:?} matches several tasks: {}", candidates.join(", "))]
    AmbiguousTask {
        query: String,
        candidates: Vec<String>,
    },

    #[error("already opted out of {task_name}: {reason}")]
    AlreadyOptedOut { task_name: String, reason: String },

    #[error("opted out of {task_name}: {reason}")]
    OptedOut { task_name: String, reason: String },

    #[error("no active week")]
    NoActiveWeek,

    /// The open week could not be read back while building its rollover
    /// snapshot. Should not occur under correct sequencing.
    #[error("missing snapshot for the week being rolled over")]
    MissingSnapshot,

    #[error("week row referenced by a task instance is missing")]
    MissingWeek,
}
