//! Row models and DTOs, one module per table.

pub mod completion_log;
pub mod opt_out;
pub mod person;
pub mod status;
pub mod task_instance;
pub mod task_type;
pub mod week;
