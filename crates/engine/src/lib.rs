//! Week/task lifecycle engine.
//!
//! Sits between the persistence layer (`rota-db`) and a presentation
//! transport (chat platform, CLI, tests). The engine owns the week state
//! machine, the atomic complete/amend transitions, progress aggregation,
//! and the tick-driven reminder/rollover scheduler. It never renders
//! user-facing text except through [`reminder`], whose output goes
//! straight to a [`dispatch::NotificationDispatcher`].

pub mod dispatch;
pub mod error;
pub mod lifecycle;
pub mod reminder;
pub mod scheduler;
pub mod service;
pub mod status;

pub use dispatch::NotificationDispatcher;
pub use error::{EngineError, EngineResult};
pub use scheduler::SchedulerConfig;
pub use service::RotaService;
