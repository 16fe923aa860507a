//! Survey task record.
//!
//! A task is one parcel to visit: the base photograph, the annotations drawn
//! on it, and the questionnaire answers. The annotation engine only reads and
//! replaces [`SurveyTask::annotations`]; everything else is carried as data.

use serde::{Deserialize, Serialize};

use crate::store::Annotations;

/// Progress of a survey task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Pending,
    /// Reopened for corrections.
    Editing,
    Completed,
}

impl TaskStatus {
    pub fn name(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Editing => "Editing",
            TaskStatus::Completed => "Completed",
        }
    }
}

/// Photo references attached to the questionnaire, grouped by subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyPhotos {
    #[serde(default)]
    pub irrigation: Vec<String>,
    #[serde(default)]
    pub land: Vec<String>,
    #[serde(default)]
    pub surrounding: Vec<String>,
}

/// Questionnaire answers for a task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionData {
    #[serde(default)]
    pub irrigation_methods: Vec<String>,
    #[serde(default)]
    pub land_status: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_status: Option<String>,
    #[serde(default)]
    pub photos: SurveyPhotos,
}

/// One surveyed parcel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyTask {
    pub id: String,
    pub code: String,
    pub year: String,
    pub owner: String,
    /// URL or path of the base photograph.
    pub base_image: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub annotations: Annotations,
    #[serde(default)]
    pub form_data: InspectionData,
    /// Last modification (ISO 8601).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl SurveyTask {
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        year: impl Into<String>,
        owner: impl Into<String>,
        base_image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            year: year.into(),
            owner: owner.into(),
            base_image: base_image.into(),
            status: TaskStatus::Pending,
            annotations: Annotations::new(),
            form_data: InspectionData::default(),
            updated_at: None,
        }
    }

    /// Whether the task matches a task-list search (substring of code or owner).
    pub fn matches(&self, query: &str) -> bool {
        self.code.contains(query) || self.owner.contains(query)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Some(crate::format::project::current_timestamp());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_code_or_owner() {
        let task = SurveyTask::new("115-3", "P0003", "115", "Lin", "img.jpg");
        assert!(task.matches("P00"));
        assert!(task.matches("Lin"));
        assert!(task.matches(""));
        assert!(!task.matches("lin"));
        assert!(!task.matches("P0004"));
    }

    #[test]
    fn test_status_serializes_screaming_case() {
        let json = serde_json::to_string(&TaskStatus::Completed).unwrap();
        assert_eq!(json, "\"COMPLETED\"");
    }

    #[test]
    fn test_missing_optional_sections_default() {
        let json = r#"{"id":"1","code":"P0001","year":"115","owner":"Wang","baseImage":"a.jpg"}"#;
        let task: SurveyTask = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.annotations.markers().is_empty());
        assert!(task.form_data.irrigation_methods.is_empty());
    }
}
