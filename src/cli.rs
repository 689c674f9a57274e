use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Single-user task tracker with a terminal dashboard.
/// Storage defaults to ~/.taskboard/tasks.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "tb", version, about = "Track tasks from the terminal")]
pub struct Cli {
    /// Path to the JSON task file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Keep tasks in memory only; nothing is read from or written to disk.
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Log level: trace | debug | info | warn | error | off. RUST_LOG overrides.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Defaults to `ui` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}
