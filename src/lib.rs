//! # task-tracker
//!
//! A small command-line task tracker. Tasks live in a single JSON document
//! (`tasks.json` in the working directory by default) that is loaded whole,
//! changed by one command, and written whole back to disk.
//!
//! ```bash
//! task-tracker add "buy milk"
//! task-tracker mark-in-progress 1
//! task-tracker update 1 "buy oat milk" done
//! task-tracker list done
//! task-tracker delete 1
//! ```
//!
//! The store itself is independent of the CLI: [`db::TaskStore`] works over any
//! [`storage::Storage`] backend, so it can be driven from tests or embedded
//! with [`storage::MemoryStorage`].

use tracing_subscriber::EnvFilter;

pub mod cli;
pub mod cmd;
pub mod db;
pub mod error;
pub mod fields;
pub mod storage;
pub mod task;

pub use db::{TaskList, TaskStore};
pub use error::{Error, Result};
pub use fields::Status;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use task::Task;

/// Task file used when no `--db` path is given.
pub const DEFAULT_TASK_FILE: &str = "tasks.json";

/// Install the stderr log subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
