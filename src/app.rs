//! Scripted editing session.
//!
//! Opens one task of a project file, replays a JSON array of editor messages
//! against it, and writes the project back after every message that changed
//! the task's annotations. Optionally exports the final scene as SVG.

use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::constants::{DEFAULT_EXPORT_SIZE, DEFAULT_SEED_TASKS};
use crate::error::AppError;
use crate::format::{self, FormatError, ProjectData};
use crate::message::Message;
use crate::model::TaskStatus;
use crate::session::EditorSession;

/// Command-line usage.
pub const USAGE: &str = "usage: plotmark <project.json> <task-id> <script.json> [out.svg]";

/// Parsed command-line arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub project: PathBuf,
    pub task_id: String,
    pub script: PathBuf,
    pub svg_out: Option<PathBuf>,
}

impl Args {
    /// Parse arguments, excluding the program name.
    pub fn parse(args: &[String]) -> Result<Self, AppError> {
        match args {
            [project, task_id, script] => Ok(Self {
                project: project.into(),
                task_id: task_id.clone(),
                script: script.into(),
                svg_out: None,
            }),
            [project, task_id, script, svg] => Ok(Self {
                project: project.into(),
                task_id: task_id.clone(),
                script: script.into(),
                svg_out: Some(svg.into()),
            }),
            _ => Err(AppError::Usage(USAGE.to_string())),
        }
    }
}

/// Summary of a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayReport {
    pub messages: usize,
    pub changes: usize,
    pub markers: usize,
    pub ranges: usize,
}

/// Load the project, or seed a fresh one if the file does not exist yet.
pub fn open_project(path: &Path) -> Result<ProjectData, FormatError> {
    if path.exists() {
        return ProjectData::load(path);
    }
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("survey")
        .to_string();
    log::info!("No project at {:?}, creating '{}'", path, name);
    let mut project = ProjectData::seeded(name, DEFAULT_SEED_TASKS);
    project.save(path)?;
    Ok(project)
}

/// Read a script of editor messages.
pub fn load_script(path: &Path) -> Result<Vec<Message>, FormatError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Replay a script against one task of the project at `args.project`.
pub fn run(args: &Args, config: &AppConfig) -> Result<ReplayReport, AppError> {
    let mut project = open_project(&args.project)?;
    let script = load_script(&args.script)?;

    let task = project
        .task(&args.task_id)
        .ok_or_else(|| FormatError::task_not_found(&args.task_id))?;
    let mut session = EditorSession::open(task, config);
    project.set_status(&args.task_id, TaskStatus::Editing)?;
    project.save(&args.project)?;

    let mut changes = 0;
    for (i, message) in script.iter().enumerate() {
        let changed = session
            .update(message.clone())
            .inspect_err(|_| log::error!("Script step {} ({}) failed", i + 1, message.name()))?;
        if changed {
            changes += 1;
            project.replace_annotations(&args.task_id, session.annotations().clone())?;
            project.save(&args.project)?;
        }
    }

    if let Some(svg_path) = &args.svg_out {
        let (width, height) = session
            .container()
            .filter(|rect| !rect.is_degenerate())
            .map_or(DEFAULT_EXPORT_SIZE, |rect| {
                (rect.width.round() as u32, rect.height.round() as u32)
            });
        format::save_svg(&session.scene(), width, height, svg_path)?;
    }

    let annotations = session.close();
    let report = ReplayReport {
        messages: script.len(),
        changes,
        markers: annotations.markers().len(),
        ranges: annotations.ranges().len(),
    };
    log::info!(
        "✅ Replayed {} messages on task {}: {} changes, {} markers, {} plot ranges",
        report.messages,
        args.task_id,
        report.changes,
        report.markers,
        report.ranges
    );
    Ok(report)
}
