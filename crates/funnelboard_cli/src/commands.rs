//! Subcommand implementations.

use crate::cli::{ExportJsonArgs, ImportArgs, ProjectFileArgs, StoreArgs, TimelineArgs};
use chrono::Utc;
use funnelboard_core::db::open_db;
use funnelboard_core::export::ProjectFileRef;
use funnelboard_core::projection::{project_board, project_calendar, project_timeline};
use funnelboard_core::service::export_json;
use funnelboard_core::{
    core_version, import_project, ping, EngineConfig, Project, ProjectRepository,
    SqliteProjectRepository,
};
use log::info;
use std::error::Error;
use std::path::Path;

pub type CommandResult = Result<(), Box<dyn Error>>;

pub fn run_ping() -> CommandResult {
    println!("funnelboard_core ping={}", ping());
    println!("funnelboard_core version={}", core_version());
    Ok(())
}

pub fn run_board(args: &ProjectFileArgs) -> CommandResult {
    let project = load_project_file(&args.file)?;
    let board = project_board(&project.nodes);
    for (column, tasks) in board.iter() {
        println!("{} ({})", column.title(), tasks.len());
        for task in tasks {
            println!("  - {} [{}]", task.label().unwrap_or("N/A"), task.id);
        }
    }
    Ok(())
}

pub fn run_calendar(args: &ProjectFileArgs) -> CommandResult {
    let project = load_project_file(&args.file)?;
    let entries = project_calendar(&project.nodes, &project.calendar_events);
    for entry in &entries {
        let event = &entry.event;
        println!(
            "{}  {}{}{}",
            event.start.format("%Y-%m-%d"),
            event.title,
            if entry.is_read_only() { "  (task)" } else { "" },
            if event.completed { "  [done]" } else { "" }
        );
    }
    if entries.is_empty() {
        println!("no calendar entries");
    }
    Ok(())
}

pub fn run_timeline(args: &TimelineArgs, config: &EngineConfig) -> CommandResult {
    let project = load_project_file(&args.project.file)?;
    let today = args.today.unwrap_or_else(|| Utc::now().date_naive());
    let timeline = project_timeline(&project.nodes, today, config.timeline_fallback_days);
    let window = timeline.window;
    println!(
        "window {} .. {} ({} days)",
        window.start, window.end, window.total_days
    );
    for bar in &timeline.bars {
        println!(
            "  +{:<4} {:>3}d  {}",
            bar.offset_days,
            bar.duration_days,
            bar.node.label().unwrap_or("N/A")
        );
    }
    Ok(())
}

pub fn run_export_json(args: &ExportJsonArgs) -> CommandResult {
    let project = load_project_file(&args.project.file)?;
    let artifact = export_json(&ProjectFileRef {
        name: &project.name,
        nodes: &project.nodes,
        edges: &project.edges,
        presentation_order: &project.presentation_order,
        analysis: project.analysis,
    })?;
    let out_dir = args.out_dir.as_deref().unwrap_or_else(|| Path::new("."));
    let target = out_dir.join(&artifact.file_name);
    std::fs::write(&target, artifact.contents)?;
    println!("wrote {}", target.display());
    Ok(())
}

pub fn run_import(args: &ImportArgs) -> CommandResult {
    let project = load_project_file(&args.project.file)?;
    let conn = open_db(&args.store.db)?;
    let repo = SqliteProjectRepository::new(&conn);
    let id = repo.create_project(&project)?;
    info!("event=cli_import module=cli status=ok project_id={id}");
    println!("imported {} as {id}", project.name);
    Ok(())
}

pub fn run_list(args: &StoreArgs) -> CommandResult {
    let conn = open_db(&args.db)?;
    let repo = SqliteProjectRepository::new(&conn);
    for summary in repo.list_projects()? {
        println!(
            "{}  {}  updated {}",
            summary.id,
            summary.name,
            summary.updated_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

fn load_project_file(path: &Path) -> Result<Project, Box<dyn Error>> {
    let raw = std::fs::read_to_string(path)?;
    let default_name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("Imported project");
    Ok(import_project(&raw, default_name)?)
}
