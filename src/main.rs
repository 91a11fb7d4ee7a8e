use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use task_tracker::cli::Cli;
use task_tracker::cmd::{cmd_completions, run, usage_error, Commands};
use task_tracker::{init_logging, FileStorage, TaskStore};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => {
            // --help / --version
            print!("{}", e.render());
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            println!("{}", usage_error(&e));
            return ExitCode::FAILURE;
        }
    };

    init_logging(cli.verbose);

    // Completions don't need a task file.
    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return ExitCode::SUCCESS;
    }

    let store = match TaskStore::load(FileStorage::new(&cli.db)) {
        Ok(store) => store,
        Err(e) => {
            debug!(path = %cli.db.display(), "load failed");
            println!("Error loading tasks: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&store, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
