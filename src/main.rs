//! # tb - taskboard
//!
//! A single-user task tracker with a command line and a terminal dashboard.
//!
//! ## Quick Start
//!
//! ```bash
//! # Open the dashboard
//! tb
//!
//! # Add a task from the shell
//! tb add "Write report" --due friday --priority high
//!
//! # List pending tasks, soonest first
//! tb list --status pending --sort due-date-asc
//!
//! # Counts for everything
//! tb stats
//! ```
//!
//! Tasks are stored in `~/.taskboard/tasks.json` unless `--db` points
//! elsewhere. `--ephemeral` keeps everything in memory for one run.

use clap::Parser;
use tracing::debug;

use taskboard::cli::Cli;
use taskboard::cmd::*;
use taskboard::config::Config;
use taskboard::fields::Status;
use taskboard::logging::{init_logging, LogTarget};
use taskboard::store::TaskStore;
use taskboard::Result;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Ui);

    // Completions need neither storage nor logging.
    if let Commands::Completions { shell } = command {
        cmd_completions(shell);
        return Ok(());
    }

    let config = Config::resolve(cli.db, cli.ephemeral, cli.log_level);
    config.ensure_data_dir()?;

    let target = match command {
        Commands::Ui => LogTarget::File(config.log_path()),
        _ => LogTarget::Stderr,
    };
    if let Err(e) = init_logging(&config.log_level, target) {
        eprintln!("Warning: {e}");
    }
    debug!(db = %config.db_path.display(), ephemeral = config.ephemeral, "configuration resolved");

    let mut store = TaskStore::initialize(config.storage());

    match command {
        Commands::Ui => cmd_ui(&mut store),
        Commands::Add { title, desc, due, priority, status } => {
            cmd_add(&mut store, title, desc, due, priority, status)
        }
        Commands::List { search, sort, status, priority, limit } => {
            cmd_list(&store, &search, sort, status, priority, limit);
            Ok(())
        }
        Commands::Stats { status, priority, json } => cmd_stats(&store, status, priority, json),
        Commands::View { id } => cmd_view(&store, &id),
        Commands::Update { id, title, desc, due, clear_due, priority, status } => {
            cmd_update(&mut store, &id, title, desc, due, clear_due, priority, status)
        }
        Commands::Complete { id } => cmd_set_status(&mut store, &id, Status::Completed),
        Commands::Reopen { id } => cmd_set_status(&mut store, &id, Status::Pending),
        Commands::Toggle { id } => cmd_toggle(&mut store, &id),
        Commands::Delete { id } => cmd_delete(&mut store, &id),
        Commands::Export { output } => cmd_export(&store, output),
        Commands::Import { input } => cmd_import(&mut store, input),
        Commands::Completions { .. } => Ok(()),
    }
}
