use crate::error::{Result, SpecboardError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

/// Marker directory of a spec-kit project.
pub const SPECIFY_DIR: &str = ".specify";
/// Per-feature spec documents live under this directory.
pub const SPECS_DIR: &str = "specs";
/// Marker directory of a spec-workflow-mcp project.
pub const SPEC_WORKFLOW_DIR: &str = ".spec-workflow";

pub const CONSTITUTION_FILE: &str = ".specify/memory/constitution.md";
/// Older spec-kit layouts kept the constitution outside `.specify/`.
pub const CONSTITUTION_FILE_LEGACY: &str = "memory/constitution.md";

pub const AGENTS_DIR: &str = ".claude/agents";

pub const TASKS_FILE: &str = "tasks.md";

/// Spec documents a client may read or write, per feature directory.
/// Everything else is rejected — this is the path-traversal allow-list.
pub const SPEC_FILES: &[&str] = &[
    "spec.md",
    "plan.md",
    "tasks.md",
    "research.md",
    "data-model.md",
    "quickstart.md",
];

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn specs_dir(project: &Path) -> PathBuf {
    project.join(SPECS_DIR)
}

pub fn feature_dir(project: &Path, feature: &str) -> PathBuf {
    specs_dir(project).join(feature)
}

pub fn spec_file_path(project: &Path, feature: &str, filename: &str) -> PathBuf {
    feature_dir(project, feature).join(filename)
}

pub fn agents_dir(project: &Path) -> PathBuf {
    project.join(AGENTS_DIR)
}

// ---------------------------------------------------------------------------
// Filename validation
// ---------------------------------------------------------------------------

/// Reject filenames that could escape a project directory via traversal.
pub fn validate_filename(filename: &str) -> Result<()> {
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
        || filename.contains('\0')
    {
        return Err(SpecboardError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

/// Validate against the fixed spec-file allow-list (after the traversal check).
pub fn validate_spec_filename(filename: &str) -> Result<()> {
    validate_filename(filename)?;
    if !SPEC_FILES.contains(&filename) {
        return Err(SpecboardError::FileNotAllowed(filename.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Feature directory names
// ---------------------------------------------------------------------------

static FEATURE_DIR_RE: OnceLock<Regex> = OnceLock::new();

fn feature_dir_re() -> &'static Regex {
    FEATURE_DIR_RE.get_or_init(|| Regex::new(r"^\d{3}-").unwrap())
}

/// True for spec-kit numbered feature directories like `001-user-auth`.
pub fn is_feature_dir_name(name: &str) -> bool {
    feature_dir_re().is_match(name)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
