use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Simple, file-backed task tracker.
/// Storage defaults to ./tasks.json or a path passed via --db.
#[derive(Parser, Debug)]
#[command(name = "task-tracker", version, about = "Track tasks in a local JSON file")]
pub struct Cli {
    /// Path to the JSON task file.
    #[arg(long, global = true, env = "TASK_TRACKER_DB", default_value = crate::DEFAULT_TASK_FILE)]
    pub db: PathBuf,

    /// Log store activity to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
