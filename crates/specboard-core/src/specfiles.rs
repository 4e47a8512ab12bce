//! Spec document access for a single project.
//!
//! All reads and writes go through the filename allow-list in [`paths`];
//! the functions here are synchronous and are run on a blocking thread by
//! the server.

use crate::error::{Result, SpecboardError};
use crate::io;
use crate::paths;
use crate::tasks::{self, Phase, Task};
use std::path::Path;

// ---------------------------------------------------------------------------
// Features
// ---------------------------------------------------------------------------

/// Numbered feature directories under `specs/`, name order. A project
/// without a `specs/` directory simply has no features.
pub fn list_features(project: &Path) -> Result<Vec<String>> {
    let specs = paths::specs_dir(project);
    if !specs.is_dir() {
        return Ok(Vec::new());
    }
    let mut features = Vec::new();
    for entry in std::fs::read_dir(&specs)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if paths::is_feature_dir_name(&name) && entry.file_type()?.is_dir() {
            features.push(name);
        }
    }
    features.sort();
    Ok(features)
}

fn require_feature_dir(project: &Path, feature: &str) -> Result<std::path::PathBuf> {
    paths::validate_filename(feature)?;
    let dir = paths::feature_dir(project, feature);
    if !dir.is_dir() {
        return Err(SpecboardError::FeatureNotFound(feature.to_string()));
    }
    Ok(dir)
}

/// Allow-listed files actually present in a feature directory, in
/// allow-list order.
pub fn list_feature_files(project: &Path, feature: &str) -> Result<Vec<String>> {
    let dir = require_feature_dir(project, feature)?;
    Ok(paths::SPEC_FILES
        .iter()
        .filter(|name| dir.join(name).is_file())
        .map(|name| name.to_string())
        .collect())
}

// ---------------------------------------------------------------------------
// Spec file read/write
// ---------------------------------------------------------------------------

pub fn read_spec_file(project: &Path, feature: &str, filename: &str) -> Result<String> {
    paths::validate_spec_filename(filename)?;
    let dir = require_feature_dir(project, feature)?;
    let path = dir.join(filename);
    if !path.is_file() {
        return Err(SpecboardError::SpecFileNotFound(format!(
            "{feature}/{filename}"
        )));
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Full-file overwrite, atomic. The file does not need to exist yet.
pub fn write_spec_file(project: &Path, feature: &str, filename: &str, content: &str) -> Result<()> {
    paths::validate_spec_filename(filename)?;
    let dir = require_feature_dir(project, feature)?;
    io::atomic_write(&dir.join(filename), content.as_bytes())
}

// ---------------------------------------------------------------------------
// Constitution
// ---------------------------------------------------------------------------

fn constitution_path(project: &Path) -> Option<std::path::PathBuf> {
    let primary = project.join(paths::CONSTITUTION_FILE);
    if primary.is_file() {
        return Some(primary);
    }
    let legacy = project.join(paths::CONSTITUTION_FILE_LEGACY);
    if legacy.is_file() {
        return Some(legacy);
    }
    None
}

pub fn read_constitution(project: &Path) -> Result<String> {
    let path = constitution_path(project).ok_or_else(|| {
        SpecboardError::ConstitutionNotFound(project.display().to_string())
    })?;
    Ok(std::fs::read_to_string(path)?)
}

/// Overwrite the constitution in place, or create it at the current layout
/// location when the project has none yet.
pub fn write_constitution(project: &Path, content: &str) -> Result<()> {
    let path = constitution_path(project)
        .unwrap_or_else(|| project.join(paths::CONSTITUTION_FILE));
    io::atomic_write(&path, content.as_bytes())
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Read and parse a feature's `tasks.md`.
pub fn load_tasks(project: &Path, feature: &str) -> Result<Vec<Phase>> {
    let content = read_spec_file(project, feature, paths::TASKS_FILE)?;
    Ok(tasks::parse_tasks_markdown(&content))
}

fn find_task<'a>(phases: &'a [Phase], task_id: &str) -> Option<&'a Task> {
    phases
        .iter()
        .flat_map(|phase| phase.tasks.iter())
        .find(|task| task.id == task_id)
}

/// Toggle one task's checkbox by id: locate its verbatim line in
/// `tasks.md`, flip the marker, persist atomically, and return the
/// re-parsed phases.
pub fn toggle_task(project: &Path, feature: &str, task_id: &str) -> Result<Vec<Phase>> {
    let content = read_spec_file(project, feature, paths::TASKS_FILE)?;
    let phases = tasks::parse_tasks_markdown(&content);
    let task = find_task(&phases, task_id)
        .ok_or_else(|| SpecboardError::TaskNotFound(task_id.to_string()))?;

    let (updated, _) = tasks::toggle_task_line(&content, &task.line)?;
    let dir = require_feature_dir(project, feature)?;
    io::atomic_write(&dir.join(paths::TASKS_FILE), updated.as_bytes())?;

    Ok(tasks::parse_tasks_markdown(&updated))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
