//! Command implementations for bonsai-cli

pub mod brain;
pub mod configure;
pub mod diagnose;
pub mod project;
pub mod sims;
pub mod train;

pub use brain::{run_create, run_delete, run_list, run_push};
pub use configure::{run_configure, run_switch};
pub use diagnose::run_diagnose;
pub use project::{run_project_add, run_project_files, run_project_init, run_project_remove, run_project_validate};
pub use sims::{run_log, run_sims_list};
pub use train::{run_train_resume, run_train_start, run_train_status, run_train_stop};
