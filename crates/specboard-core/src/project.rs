use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ProjectType
// ---------------------------------------------------------------------------

/// Recognized kinds of managed project directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectType {
    SpecKit,
    SpecWorkflowMcp,
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectType::SpecKit => write!(f, "spec-kit"),
            ProjectType::SpecWorkflowMcp => write!(f, "spec-workflow-mcp"),
        }
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// A discovered project in the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    /// Directory name, used as the display name.
    pub name: String,
    pub path: PathBuf,
    pub project_type: ProjectType,
    pub discovered_at: DateTime<Utc>,
}

impl Project {
    pub fn new(path: PathBuf, project_type: ProjectType, discovered_at: DateTime<Utc>) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            id: project_id(&path),
            name,
            path,
            project_type,
            discovered_at,
        }
    }
}

/// Stable id for a project path: SHA-256 of the absolute path, first 16 hex
/// chars. Identical paths yield identical ids across restarts; collisions
/// are treated as practically impossible.
pub fn project_id(path: &Path) -> String {
    let digest = Sha256::digest(path.to_string_lossy().as_bytes());
    let mut id = String::with_capacity(16);
    for byte in digest.iter().take(8) {
        id.push_str(&format!("{byte:02x}"));
    }
    id
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
