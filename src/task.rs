//! Task data structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::Status;

/// A single tracked work item.
///
/// `created_at` is captured once when the task is added and never touched again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub description: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a fresh `not started` task stamped with the current time.
    pub fn new(id: u64, description: impl Into<String>) -> Self {
        Task {
            id,
            description: description.into(),
            status: Status::NotStarted,
            created_at: Utc::now(),
        }
    }
}
