//! Repository structs, one per table.
//!
//! Single-statement operations take `impl PgExecutor` so the engine can
//! run them against the pool or inside an open transaction; every state
//! transition is a guarded UPDATE that succeeds only when the row is still
//! in the expected pre-state.

mod completion_log_repo;
mod opt_out_repo;
mod person_repo;
mod task_instance_repo;
mod task_type_repo;
mod week_repo;

pub use completion_log_repo::CompletionLogRepo;
pub use opt_out_repo::OptOutRepo;
pub use person_repo::PersonRepo;
pub use task_instance_repo::TaskInstanceRepo;
pub use task_type_repo::TaskTypeRepo;
pub use week_repo::WeekRepo;
