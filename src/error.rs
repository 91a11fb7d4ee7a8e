//! Error types shared by the store and the command handlers.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong in a single invocation.
#[derive(Debug, Error)]
pub enum Error {
    /// The task file exists but could not be read or written.
    #[error("failed to {action} {}: {source}", path.display())]
    Storage {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The task file content is not a valid task list.
    #[error("malformed task data: {0}")]
    Format(#[from] serde_json::Error),

    /// The highest task ID is already `u64::MAX`, so no new ID can be assigned.
    #[error("no task IDs left: the highest ID is already {}", u64::MAX)]
    IdsExhausted,

    /// An id argument that is not a number.
    #[error("Invalid ID: {0}")]
    InvalidId(String),

    /// A status argument that names none of the known statuses.
    #[error("Invalid status: {0} (expected one of: not started, in progress, done)")]
    InvalidStatus(String),

    /// Missing arguments or an unknown command.
    #[error("{0}")]
    Usage(String),
}

impl Error {
    pub(crate) fn storage(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Storage {
            action,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
