//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "funnelboard",
    version,
    about = "Inspect, convert and store funnelboard project files"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Engine configuration JSON (partial files fall back to defaults).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off without it.
    #[arg(long = "log-dir", value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print engine health and version.
    Ping,

    /// Print the task board columns of a project file.
    Board(ProjectFileArgs),

    /// Print the calendar read model (stored events plus task deadlines).
    Calendar(ProjectFileArgs),

    /// Print timeline bars of tasks with start and end dates.
    Timeline(TimelineArgs),

    /// Validate a project file and write it back as a normalized export.
    ExportJson(ExportJsonArgs),

    /// Import a project file into a SQLite project store.
    Import(ImportArgs),

    /// List projects held in a SQLite project store.
    List(StoreArgs),
}

#[derive(Parser)]
pub struct ProjectFileArgs {
    /// Project JSON file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Parser)]
pub struct TimelineArgs {
    #[command(flatten)]
    pub project: ProjectFileArgs,

    /// Anchor day (YYYY-MM-DD) used when no task has both dates; defaults to today.
    #[arg(long = "today", value_name = "DATE")]
    pub today: Option<chrono::NaiveDate>,
}

#[derive(Parser)]
pub struct ExportJsonArgs {
    #[command(flatten)]
    pub project: ProjectFileArgs,

    /// Output directory (default: current directory).
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ImportArgs {
    #[command(flatten)]
    pub project: ProjectFileArgs,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Parser)]
pub struct StoreArgs {
    /// SQLite project store file (created when missing).
    #[arg(long = "db", value_name = "PATH")]
    pub db: PathBuf,
}
