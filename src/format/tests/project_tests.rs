//! Tests for the project file.

use crate::format::FormatError;
use crate::format::project::ProjectData;
use crate::model::{MarkerKind, Point, TaskStatus};
use crate::store::Annotations;

/// Annotations with one marker and a finished triangle.
fn sample_annotations() -> Annotations {
    let (store, _) = Annotations::new().add_marker(MarkerKind::SeriesInlet);
    let (store, id) = store.start_range();
    let store = store.append_point(&id, Point::new(10.0, 10.0)).unwrap();
    let store = store.append_point(&id, Point::new(90.0, 10.0)).unwrap();
    store.append_point(&id, Point::new(90.0, 90.0)).unwrap()
}

#[test]
fn test_seeded_tasks() {
    let project = ProjectData::seeded("115年度農地現勘專案", 131);
    assert_eq!(project.tasks.len(), 131);

    let first = &project.tasks[0];
    assert_eq!(first.id, "115-1");
    assert_eq!(first.code, "P0001");
    assert_eq!(first.year, "115");
    assert_eq!(first.owner, "王大明");
    assert_eq!(first.base_image, "https://picsum.photos/seed/50/1200/800");
    assert_eq!(first.status, TaskStatus::Pending);
    assert!(first.annotations.markers().is_empty());

    assert_eq!(project.tasks[1].owner, "林建國");
    assert_eq!(project.tasks[2].owner, "行政院農業部");
    assert_eq!(project.tasks[130].code, "P0131");
}

#[test]
fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("survey.json");

    let mut project = ProjectData::seeded("survey", 3);
    project.replace_annotations("115-2", sample_annotations()).unwrap();
    project.set_status("115-2", TaskStatus::Editing).unwrap();
    project.save(&path).unwrap();

    // No temporary file left behind
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);

    let loaded = ProjectData::load(&path).unwrap();
    let task = loaded.task("115-2").unwrap();
    assert_eq!(task.status, TaskStatus::Editing);
    assert!(task.updated_at.is_some());
    assert_eq!(task.annotations, sample_annotations());
    assert_eq!(task.annotations.markers()[0].kind, MarkerKind::SeriesInlet);
    assert!(loaded.task("115-1").unwrap().updated_at.is_none());
}

#[test]
fn test_ids_stay_unique_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("survey.json");

    let mut project = ProjectData::seeded("survey", 1);
    project.replace_annotations("115-1", sample_annotations()).unwrap();
    project.save(&path).unwrap();

    let loaded = ProjectData::load(&path).unwrap();
    let annotations = &loaded.task("115-1").unwrap().annotations;
    let (next, id) = annotations.add_marker(MarkerKind::Well);
    assert!(annotations.marker(&id).is_none());
    assert!(annotations.range(&id).is_none());
    assert_eq!(next.markers().len(), 2);
}

#[test]
fn test_task_json_shape() {
    let mut project = ProjectData::seeded("survey", 1);
    project.replace_annotations("115-1", sample_annotations()).unwrap();
    let json = serde_json::to_value(&project).unwrap();

    let task = &json["tasks"][0];
    assert_eq!(task["baseImage"], "https://picsum.photos/seed/50/1200/800");
    assert_eq!(task["status"], "PENDING");
    let marker = &task["annotations"]["markers"][0];
    assert_eq!(marker["type"], "SERIES_INLET");
    assert_eq!(marker["x"], 50.0);
    assert_eq!(marker["y"], 50.0);
    assert_eq!(task["annotations"]["ranges"][0]["points"][2]["x"], 90.0);
    assert!(task["formData"]["photos"]["irrigation"].is_array());
}

#[test]
fn test_unknown_task() {
    let mut project = ProjectData::seeded("survey", 2);
    let result = project.set_status("115-99", TaskStatus::Completed);
    assert!(matches!(result, Err(FormatError::TaskNotFound { id }) if id == "115-99"));
    assert!(
        project
            .replace_annotations("nope", Annotations::new())
            .is_err()
    );
}

#[test]
fn test_search_code_or_owner() {
    let project = ProjectData::seeded("survey", 12);
    let by_code: Vec<_> = project.search("P001").map(|t| t.id.as_str()).collect();
    assert_eq!(by_code, vec!["115-10", "115-11", "115-12"]);

    assert_eq!(project.search("林建國").count(), 4);
    assert_eq!(project.search("").count(), 12);
    assert_eq!(project.search("p001").count(), 0);
}

#[test]
fn test_import_tasks() {
    let mut project = ProjectData::new("survey");
    let added = project.import_tasks("P0101,王小明,https://example.com/a.jpg\n\n,,\nP0103");
    assert_eq!(added, 3);

    assert_eq!(project.tasks[0].code, "P0101");
    assert_eq!(project.tasks[0].owner, "王小明");
    assert_eq!(project.tasks[0].base_image, "https://example.com/a.jpg");

    assert_eq!(project.tasks[1].code, "P0002");
    assert_eq!(project.tasks[1].owner, "未知業主");
    assert_eq!(project.tasks[1].base_image, "https://picsum.photos/seed/1/1200/800");

    assert_eq!(project.tasks[2].code, "P0103");
    assert_ne!(project.tasks[0].id, project.tasks[2].id);

    project.import_tasks("P0200");
    let ids: std::collections::HashSet<_> = project.tasks.iter().map(|t| &t.id).collect();
    assert_eq!(ids.len(), 4);
}

#[test]
fn test_version_compatibility() {
    assert!(ProjectData::is_version_compatible("0.1.0"));
    assert!(ProjectData::is_version_compatible("0.1.7"));
    assert!(!ProjectData::is_version_compatible("0.2.0"));
    assert!(!ProjectData::is_version_compatible("1.1.0"));
    assert!(!ProjectData::is_version_compatible("0.1"));
    assert_eq!(ProjectData::parse_version("2.10.3"), Some((2, 10, 3)));
}

#[test]
fn test_incompatible_file_rejected() {
    let json = r#"{"version": "0.9.0", "projectName": "old", "tasks": []}"#;
    let result = ProjectData::from_json(json);
    assert!(matches!(
        result,
        Err(FormatError::VersionMismatch { ref found, .. }) if found == "0.9.0"
    ));
}

#[test]
fn test_minimal_task_defaults() {
    let json = r#"{
        "version": "0.1.0",
        "tasks": [{"id": "t1", "code": "P0001", "year": "115", "owner": "Lin", "baseImage": "a.jpg"}]
    }"#;
    let project = ProjectData::from_json(json).unwrap();
    let task = project.task("t1").unwrap();
    assert_eq!(task.status, TaskStatus::Pending);
    assert!(task.annotations.ranges().is_empty());
    assert!(task.form_data.irrigation_methods.is_empty());
}
