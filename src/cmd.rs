//! Command implementations for the CLI interface.
//!
//! Each handler applies one operation to the store, saves when the operation
//! mutates, and prints its confirmation line on stdout.

use chrono::SecondsFormat;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::Subcommand;
use clap_complete::{generate, Shell};
use tracing::debug;

use crate::db::TaskStore;
use crate::error::{Error, Result};
use crate::fields::{parse_optional_status, Status};
use crate::storage::Storage;
use crate::task::Task;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new task.
    Add {
        /// What needs doing.
        description: String,
    },

    /// Update a task's description and optionally its status.
    Update {
        /// Task ID.
        #[arg(allow_negative_numbers = true)]
        id: String,
        /// New description; an empty string keeps the current one.
        description: String,
        /// New status: "not started" | "in progress" | "done".
        status: Option<String>,
    },

    /// Delete a task.
    Delete {
        /// Task ID.
        #[arg(allow_negative_numbers = true)]
        id: String,
    },

    /// List tasks, optionally only those with the given status.
    List {
        /// Status filter: "not started" | "in progress" | "done".
        status: Option<String>,
    },

    /// Mark a task as in progress.
    MarkInProgress {
        /// Task ID.
        #[arg(allow_negative_numbers = true)]
        id: String,
    },

    /// Mark a task as done.
    MarkDone {
        /// Task ID.
        #[arg(allow_negative_numbers = true)]
        id: String,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Run a command against a loaded store.
pub fn run<S: Storage>(store: &TaskStore<S>, command: Commands) -> Result<()> {
    match command {
        Commands::Add { description } => cmd_add(store, description),
        Commands::Update { id, description, status } => cmd_update(store, &id, &description, status.as_deref()),
        Commands::Delete { id } => cmd_delete(store, &id),
        Commands::List { status } => cmd_list(store, status.as_deref()),
        Commands::MarkInProgress { id } => cmd_mark_in_progress(store, &id),
        Commands::MarkDone { id } => cmd_mark_done(store, &id),
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    }
}

/// Add a new task to the store.
pub fn cmd_add<S: Storage>(store: &TaskStore<S>, description: String) -> Result<()> {
    let id = store.mutate_and_save(|list| list.add(description))?;
    println!("Task added successfully (ID: {id})");
    Ok(())
}

/// Update description and status. An unknown ID still saves and confirms.
pub fn cmd_update<S: Storage>(store: &TaskStore<S>, id: &str, description: &str, status: Option<&str>) -> Result<()> {
    let id = parse_id(id)?;
    let status = parse_optional_status(status)?;
    let found = store.mutate_and_save(|list| Ok(list.update(id, description, status)))?;
    if !found {
        debug!(id, "update matched no task");
    }
    println!("Task updated successfully");
    Ok(())
}

/// Delete a task. Prints nothing.
pub fn cmd_delete<S: Storage>(store: &TaskStore<S>, id: &str) -> Result<()> {
    let id = parse_id(id)?;
    store.mutate_and_save(|list| Ok(list.remove(id)))?;
    Ok(())
}

/// Print matching tasks; never saves.
pub fn cmd_list<S: Storage>(store: &TaskStore<S>, status: Option<&str>) -> Result<()> {
    let filter = parse_optional_status(status)?;
    for task in store.list(filter) {
        println!("{}", format_task(&task));
    }
    Ok(())
}

/// Set a task's status to in progress.
pub fn cmd_mark_in_progress<S: Storage>(store: &TaskStore<S>, id: &str) -> Result<()> {
    set_status(store, id, Status::InProgress)?;
    println!("Task marked as in progress");
    Ok(())
}

/// Set a task's status to done.
pub fn cmd_mark_done<S: Storage>(store: &TaskStore<S>, id: &str) -> Result<()> {
    set_status(store, id, Status::Done)?;
    println!("Task marked as done");
    Ok(())
}

fn set_status<S: Storage>(store: &TaskStore<S>, id: &str, status: Status) -> Result<()> {
    let id = parse_id(id)?;
    store.mutate_and_save(|list| Ok(list.set_status(id, status)))?;
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

/// Parse a task ID argument.
pub fn parse_id(raw: &str) -> Result<u64> {
    raw.trim().parse().map_err(|_| Error::InvalidId(raw.to_string()))
}

/// One line of `list` output.
pub fn format_task(task: &Task) -> String {
    format!(
        "ID: {}, Description: {}, Status: {}, Created At: {}",
        task.id,
        task.description,
        task.status,
        task.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

/// Translate an argument parsing failure into a usage error.
pub fn usage_error(err: &clap::Error) -> Error {
    if err.kind() == ErrorKind::InvalidSubcommand {
        if let Some(ContextValue::String(name)) = err.get(ContextKind::InvalidSubcommand) {
            return Error::Usage(format!("Unknown command: {name}"));
        }
    }
    Error::Usage(err.render().to_string().trim_end().to_string())
}
