//! Task collection and the store that loads, mutates, and saves it.
//!
//! The whole collection is read into memory once, one operation is applied,
//! and the whole collection is written back. `TaskStore` owns the collection
//! behind a mutex and talks to disk only through a [`Storage`] backend.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::fields::Status;
use crate::storage::Storage;
use crate::task::Task;

/// The on-disk document: an ordered list of tasks.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tasks: Vec<Task>,
}

// Older writers store an empty collection as `"tasks": null`.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Task>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Task>>::deserialize(deserializer)?.unwrap_or_default())
}

impl TaskList {
    /// Parse a task document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize with two-space indentation.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Generate the next available task ID, or `None` once `u64::MAX` is taken.
    pub fn next_id(&self) -> Option<u64> {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0).checked_add(1)
    }

    /// Append a `not started` task and return its ID.
    pub fn add(&mut self, description: impl Into<String>) -> Result<u64> {
        let id = self.next_id().ok_or(Error::IdsExhausted)?;
        self.tasks.push(Task::new(id, description));
        debug!(id, "added task");
        Ok(id)
    }

    /// Get a mutable reference to a task by ID.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Remove the first task with this ID, keeping the order of the rest.
    pub fn remove(&mut self, id: u64) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(idx))
    }

    /// Overwrite the description when non-empty and the status when given.
    pub fn update(&mut self, id: u64, description: &str, status: Option<Status>) -> bool {
        self.with_task(id, |task| {
            if !description.is_empty() {
                task.description = description.to_string();
            }
            if let Some(status) = status {
                task.status = status;
            }
        })
    }

    /// Force the status of the task with `id`.
    pub fn set_status(&mut self, id: u64, status: Status) -> bool {
        self.with_task(id, |task| task.status = status)
    }

    /// Tasks whose status equals `filter`, or all tasks for `None`, in collection order.
    pub fn filtered(&self, filter: Option<Status>) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| filter.map_or(true, |s| t.status == s))
            .cloned()
            .collect()
    }

    fn with_task(&mut self, id: u64, apply: impl FnOnce(&mut Task)) -> bool {
        match self.get_mut(id) {
            Some(task) => {
                apply(task);
                true
            }
            None => {
                debug!(id, "no such task");
                false
            }
        }
    }
}

/// Mutex-guarded task collection bound to a storage backend.
///
/// Single operations (`add`, `update`, ...) and `save` each take the lock on
/// their own. Use [`TaskStore::mutate_and_save`] when the mutation and the
/// write must not interleave with other threads.
pub struct TaskStore<S: Storage> {
    storage: S,
    list: Mutex<TaskList>,
}

impl<S: Storage> TaskStore<S> {
    /// Load the collection from `storage`; a missing document yields an empty store.
    pub fn load(storage: S) -> Result<Self> {
        let list = match storage.read()? {
            Some(json) => TaskList::from_json(&json)?,
            None => TaskList::default(),
        };
        debug!(location = %storage.location(), count = list.tasks.len(), "loaded tasks");
        Ok(TaskStore {
            storage,
            list: Mutex::new(list),
        })
    }

    /// Write the full collection back to storage.
    pub fn save(&self) -> Result<()> {
        self.write(&self.lock())
    }

    /// Apply `op` and save, holding the lock for both.
    ///
    /// Nothing is written if `op` fails. A failed write does not undo `op`.
    pub fn mutate_and_save<R>(&self, op: impl FnOnce(&mut TaskList) -> Result<R>) -> Result<R> {
        let mut list = self.lock();
        let out = op(&mut list)?;
        self.write(&list)?;
        Ok(out)
    }

    /// Append a `not started` task and return its ID.
    pub fn add(&self, description: impl Into<String>) -> Result<u64> {
        self.lock().add(description)
    }

    /// Overwrite the description when non-empty and the status when given.
    ///
    /// Returns whether a task with `id` exists; a missing task is not an error.
    pub fn update(&self, id: u64, description: &str, status: Option<Status>) -> bool {
        self.lock().update(id, description, status)
    }

    /// Remove the task with `id`. Returns whether anything was removed.
    pub fn delete(&self, id: u64) -> bool {
        let removed = self.lock().remove(id).is_some();
        if !removed {
            debug!(id, "delete: no such task");
        }
        removed
    }

    pub fn mark_in_progress(&self, id: u64) -> bool {
        self.lock().set_status(id, Status::InProgress)
    }

    pub fn mark_done(&self, id: u64) -> bool {
        self.lock().set_status(id, Status::Done)
    }

    /// Tasks whose status equals `filter`, or all tasks for `None`, in collection order.
    pub fn list(&self, filter: Option<Status>) -> Vec<Task> {
        self.lock().filtered(filter)
    }

    /// Snapshot of the whole collection.
    pub fn tasks(&self) -> Vec<Task> {
        self.lock().tasks.clone()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn write(&self, list: &TaskList) -> Result<()> {
        let json = list.to_json()?;
        self.storage.write(&json)?;
        info!(location = %self.storage.location(), count = list.tasks.len(), "saved tasks");
        Ok(())
    }

    // Tasks are plain values, so a panic mid-operation cannot leave them half-built.
    fn lock(&self) -> MutexGuard<'_, TaskList> {
        self.list.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
