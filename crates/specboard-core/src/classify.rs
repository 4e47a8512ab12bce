//! Directory classification: is this a recognized project, and which kind?
//!
//! The probe is a trait so the registry can be tested with a spy that
//! counts filesystem reads and controls outcomes.

use crate::paths;
use crate::project::ProjectType;
use async_trait::async_trait;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// How a failed probe should be treated by the caching layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeErrorKind {
    /// Path is gone. A normal negative result, cached for the full window.
    NotFound,
    /// Readable enough to know we can't read it. Logged and negative-cached.
    PermissionDenied,
    /// Anything else (including timeouts). Negative for this scan only —
    /// not cached, so the next scan retries.
    Other,
}

pub fn probe_error_kind(err: &io::Error) -> ProbeErrorKind {
    match err.kind() {
        io::ErrorKind::NotFound => ProbeErrorKind::NotFound,
        io::ErrorKind::PermissionDenied => ProbeErrorKind::PermissionDenied,
        _ => ProbeErrorKind::Other,
    }
}

// ---------------------------------------------------------------------------
// ProjectProbe
// ---------------------------------------------------------------------------

/// Filesystem access used during classification, injectable for tests.
#[async_trait]
pub trait ProjectProbe: Send + Sync {
    /// Modification time of the directory itself.
    async fn dir_mtime(&self, path: &Path) -> io::Result<SystemTime>;

    /// Read directory contents and classify. `Ok(None)` means "probed
    /// cleanly, not a recognized project".
    async fn classify(&self, path: &Path) -> io::Result<Option<ProjectType>>;
}

// ---------------------------------------------------------------------------
// FsProbe
// ---------------------------------------------------------------------------

/// Production probe backed by `tokio::fs`.
pub struct FsProbe;

#[async_trait]
impl ProjectProbe for FsProbe {
    async fn dir_mtime(&self, path: &Path) -> io::Result<SystemTime> {
        tokio::fs::metadata(path).await?.modified()
    }

    async fn classify(&self, path: &Path) -> io::Result<Option<ProjectType>> {
        if !tokio::fs::metadata(path).await?.is_dir() {
            return Ok(None);
        }

        if is_dir(&path.join(paths::SPEC_WORKFLOW_DIR)).await {
            return Ok(Some(ProjectType::SpecWorkflowMcp));
        }
        if is_dir(&path.join(paths::SPECIFY_DIR)).await {
            return Ok(Some(ProjectType::SpecKit));
        }
        if has_feature_dirs(&path.join(paths::SPECS_DIR)).await? {
            return Ok(Some(ProjectType::SpecKit));
        }
        Ok(None)
    }
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

/// True if `specs_dir` exists and holds at least one `NNN-` child directory.
async fn has_feature_dirs(specs_dir: &Path) -> io::Result<bool> {
    let mut entries = match tokio::fs::read_dir(specs_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        if paths::is_feature_dir_name(&name.to_string_lossy())
            && entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false)
        {
            return Ok(true);
        }
    }
    Ok(false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
