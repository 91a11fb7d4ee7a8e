//! Persistence backends for the task document.
//!
//! A backend only moves the whole serialized document in and out; parsing and
//! formatting stay in [`crate::db`].

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::error::{Error, Result};

/// Where the task document lives.
pub trait Storage: Send + Sync {
    /// Read the full document, or `None` if it does not exist yet.
    fn read(&self) -> Result<Option<String>>;

    /// Replace the full document.
    fn write(&self, contents: &str) -> Result<()>;

    /// Human-readable location for log lines.
    fn location(&self) -> String;
}

/// JSON file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStorage { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_else(|| "tasks.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Storage for FileStorage {
    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "task file not found, starting empty");
                Ok(None)
            }
            Err(e) => Err(Error::storage("read", &self.path, e)),
        }
    }

    /// Atomic-ish write via temp + rename, so a crash never leaves a truncated file behind.
    fn write(&self, contents: &str) -> Result<()> {
        let tmp = self.temp_path();
        let written = File::create(&tmp).and_then(|mut f| {
            f.write_all(contents.as_bytes())?;
            f.sync_all()
        });
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(Error::storage("write", &tmp, e));
        }
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            Error::storage("write", &self.path, e)
        })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory document, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    contents: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        MemoryStorage {
            contents: Mutex::new(Some(contents.into())),
        }
    }

    /// The last document written, if any.
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Storage for MemoryStorage {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.contents())
    }

    fn write(&self, contents: &str) -> Result<()> {
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(contents.to_string());
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}
