//! Domain primitives for the rota week/task lifecycle engine.
//!
//! This crate has zero internal dependencies so it can be used by the
//! persistence layer, the engine, and any future CLI tooling alike. It
//! holds the pure parts of the system: ISO-week timekeeping, progress-bar
//! quantization, the category target table, deterministic task-name
//! matching, and the domain error taxonomy.

pub mod error;
pub mod matching;
pub mod progress;
pub mod targets;
pub mod timekeeping;
pub mod types;

pub use error::DomainError;
pub use targets::CategoryTargets;
pub use timekeeping::{iso_week_of, week_window_of, IsoWeek, WeekWindow};
