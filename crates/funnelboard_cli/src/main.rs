//! funnelboard command-line tool.
//!
//! # Responsibility
//! - Exercise the core engine on project files without a UI host.
//! - Keep output deterministic for quick local checks.

mod cli;
mod commands;

use crate::cli::{Cli, Command};
use clap::Parser;
use funnelboard_core::{default_log_level, init_logging, EngineConfig};
use std::error::Error;

fn main() {
    let cli = Cli::parse();
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(error) = init_logging(level, log_dir) {
            eprintln!("error: failed to initialize logging: {error}");
            std::process::exit(1);
        }
    }

    let result = load_config(&cli).and_then(|config| match &cli.command {
        Command::Ping => commands::run_ping(),
        Command::Board(args) => commands::run_board(args),
        Command::Calendar(args) => commands::run_calendar(args),
        Command::Timeline(args) => commands::run_timeline(args, &config),
        Command::ExportJson(args) => commands::run_export_json(args),
        Command::Import(args) => commands::run_import(args),
        Command::List(args) => commands::run_list(args),
    });

    if let Err(error) = result {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<EngineConfig, Box<dyn Error>> {
    match &cli.config {
        Some(path) => Ok(EngineConfig::from_json_str(&std::fs::read_to_string(path)?)?),
        None => Ok(EngineConfig::default()),
    }
}
