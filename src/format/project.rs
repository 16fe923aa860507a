//! Project file: every survey task of one field campaign.
//!
//! # Versioning
//!
//! The project format uses semantic versioning (MAJOR.MINOR.PATCH):
//!
//! - **Version 0.x.x**: Unstable development versions. The format may change
//!   in breaking ways between any 0.x releases, so only files with the current
//!   minor version are read.
//!
//! - **Version 1.x.x** (future): Breaking changes only in major version bumps.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::FormatError;
use crate::constants::SURVEY_YEAR;
use crate::model::{SurveyTask, TaskStatus};
use crate::store::Annotations;

/// Owners cycled through by seeded placeholder tasks.
const SEED_OWNERS: [&str; 3] = ["王大明", "林建國", "行政院農業部"];

/// Owner used when an imported line leaves the field empty.
const UNKNOWN_OWNER: &str = "未知業主";

/// Complete project: campaign name, tasks and metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    /// Format version for compatibility checking.
    pub version: String,

    /// Campaign name shown in the task list.
    #[serde(default)]
    pub project_name: String,

    /// Survey tasks in list order.
    #[serde(default)]
    pub tasks: Vec<SurveyTask>,

    /// Project metadata (creation date, tool version, etc.).
    #[serde(default)]
    pub metadata: ProjectMetadata,
}

impl ProjectData {
    /// Current version of the project data format.
    pub const CURRENT_VERSION: &'static str = "0.1.0";

    /// Major version number for compatibility checking.
    pub const VERSION_MAJOR: u32 = 0;

    /// Minor version number.
    pub const VERSION_MINOR: u32 = 1;

    /// Create an empty project.
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: Self::CURRENT_VERSION.to_string(),
            project_name: project_name.into(),
            tasks: Vec::new(),
            metadata: ProjectMetadata::new(),
        }
    }

    /// A project of `count` placeholder tasks (`115-N` / `P000N`).
    pub fn seeded(project_name: impl Into<String>, count: usize) -> Self {
        let mut project = Self::new(project_name);
        project.tasks = (0..count)
            .map(|i| {
                SurveyTask::new(
                    format!("{}-{}", SURVEY_YEAR, i + 1),
                    task_code(i),
                    SURVEY_YEAR,
                    SEED_OWNERS[i % SEED_OWNERS.len()],
                    placeholder_image(i + 50),
                )
            })
            .collect();
        log::info!("🌱 Seeded {} placeholder tasks", count);
        project
    }

    /// Parse a version string into (major, minor, patch) components.
    ///
    /// Returns None if the version string is invalid.
    pub fn parse_version(version: &str) -> Option<(u32, u32, u32)> {
        let parts: Vec<&str> = version.split('.').collect();
        if parts.len() != 3 {
            return None;
        }
        let major = parts[0].parse().ok()?;
        let minor = parts[1].parse().ok()?;
        let patch = parts[2].parse().ok()?;
        Some((major, minor, patch))
    }

    /// Check if a version is compatible with the current version.
    ///
    /// For version 0.x.x (unstable), only exact minor version matches are compatible.
    /// For version 1.x.x+, any file with the same major version is compatible.
    pub fn is_version_compatible(file_version: &str) -> bool {
        let Some((file_major, file_minor, _)) = Self::parse_version(file_version) else {
            return false;
        };

        if Self::VERSION_MAJOR == 0 {
            file_major == 0 && file_minor == Self::VERSION_MINOR
        } else {
            file_major == Self::VERSION_MAJOR
        }
    }

    /// Parse a project from JSON, checking the format version.
    pub fn from_json(json: &str) -> Result<Self, FormatError> {
        let project: Self = serde_json::from_str(json)?;
        if !Self::is_version_compatible(&project.version) {
            return Err(FormatError::VersionMismatch {
                expected: Self::CURRENT_VERSION.to_string(),
                found: project.version,
            });
        }
        Ok(project)
    }

    /// Load a project file.
    pub fn load(path: &Path) -> Result<Self, FormatError> {
        let json = std::fs::read_to_string(path)?;
        let project = Self::from_json(&json)?;
        log::info!(
            "📂 Loaded project '{}' ({} tasks) from {:?}",
            project.project_name,
            project.tasks.len(),
            path
        );
        Ok(project)
    }

    /// Save the whole project. Writes a sibling temporary file first and
    /// renames it over the target, so a failed write leaves the old file.
    pub fn save(&mut self, path: &Path) -> Result<(), FormatError> {
        self.metadata.touch();
        let json = serde_json::to_string_pretty(self)?;

        let file_name = path
            .file_name()
            .ok_or_else(|| FormatError::invalid_format(format!("not a file path: {:?}", path)))?;
        let mut temp_name = file_name.to_os_string();
        temp_name.push(".tmp");
        let temp_path = path.with_file_name(temp_name);

        std::fs::write(&temp_path, json)?;
        std::fs::rename(&temp_path, path)?;
        log::debug!("💾 Saved project to {:?}", path);
        Ok(())
    }

    /// Look up a task by id.
    pub fn task(&self, id: &str) -> Option<&SurveyTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn task_mut(&mut self, id: &str) -> Result<&mut SurveyTask, FormatError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| FormatError::task_not_found(id))
    }

    /// Replace a task's annotations with a new snapshot.
    pub fn replace_annotations(&mut self, task_id: &str, annotations: Annotations) -> Result<(), FormatError> {
        let task = self.task_mut(task_id)?;
        task.annotations = annotations;
        task.touch();
        Ok(())
    }

    /// Change a task's status.
    pub fn set_status(&mut self, task_id: &str, status: TaskStatus) -> Result<(), FormatError> {
        let task = self.task_mut(task_id)?;
        if task.status != status {
            log::info!("Task {}: {} -> {}", task_id, task.status.name(), status.name());
            task.status = status;
            task.touch();
        }
        Ok(())
    }

    /// Tasks whose code or owner contains `query` (case-sensitive).
    pub fn search<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a SurveyTask> + 'a {
        self.tasks.iter().filter(move |t| t.matches(query))
    }

    /// Append tasks from `code,owner,image` lines. Empty fields get
    /// placeholders; blank lines are skipped. Returns how many were added.
    pub fn import_tasks(&mut self, text: &str) -> usize {
        let stamp = current_timestamp();
        let before = self.tasks.len();
        for (i, line) in text.lines().filter(|l| !l.trim().is_empty()).enumerate() {
            let mut fields = line.split(',').map(str::trim);
            let code = non_empty(fields.next()).map_or_else(|| task_code(i), str::to_string);
            let owner = non_empty(fields.next()).unwrap_or(UNKNOWN_OWNER);
            let image = non_empty(fields.next()).map_or_else(|| placeholder_image(i), str::to_string);
            self.tasks.push(SurveyTask::new(
                format!("task-{}-{}", stamp, before + i),
                code,
                SURVEY_YEAR,
                owner,
                image,
            ));
        }
        let added = self.tasks.len() - before;
        log::info!("📥 Imported {} tasks", added);
        added
    }
}

fn task_code(index: usize) -> String {
    format!("P{:04}", index + 1)
}

fn placeholder_image(seed: usize) -> String {
    format!("https://picsum.photos/seed/{}/1200/800", seed)
}

fn non_empty(field: Option<&str>) -> Option<&str> {
    field.filter(|f| !f.is_empty())
}

/// Project metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    /// Tool that created this file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    /// Creation timestamp (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Last modified timestamp (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,

    /// Extra data carried through untouched.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, serde_json::Value>,
}

impl ProjectMetadata {
    /// Create new metadata with the current timestamp.
    pub fn new() -> Self {
        let now = current_timestamp();
        Self {
            created_by: Some(format!("plotmark {}", env!("CARGO_PKG_VERSION"))),
            created_at: Some(now.clone()),
            modified_at: Some(now),
            extra: HashMap::new(),
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.modified_at = Some(current_timestamp());
    }
}

/// Current UTC time as ISO 8601 (`YYYY-MM-DDTHH:MM:SSZ`).
pub fn current_timestamp() -> String {
    let secs = web_time::SystemTime::now()
        .duration_since(web_time::SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format_timestamp(secs)
}

fn format_timestamp(secs: u64) -> String {
    let (year, month, day) = days_to_ymd(secs / 86400);
    let secs_today = secs % 86400;
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        year,
        month,
        day,
        secs_today / 3600,
        (secs_today % 3600) / 60,
        secs_today % 60
    )
}

/// Convert days since 1970-01-01 to (year, month, day).
fn days_to_ymd(days: u64) -> (u32, u32, u32) {
    let mut remaining = days;
    let mut year = 1970u32;
    loop {
        let year_len = if is_leap_year(year) { 366 } else { 365 };
        if remaining < year_len {
            break;
        }
        remaining -= year_len;
        year += 1;
    }

    let february = if is_leap_year(year) { 29 } else { 28 };
    let month_lengths = [31, february, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    let mut month = 1u32;
    for len in month_lengths {
        if remaining < len {
            break;
        }
        remaining -= len;
        month += 1;
    }
    (year, month, remaining as u32 + 1)
}

fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01T00:00:00Z");
        // 2024-02-29 12:34:56 UTC
        assert_eq!(format_timestamp(1_709_210_096), "2024-02-29T12:34:56Z");
    }

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
    }
}
