pub mod agents;
pub mod projects;
pub mod specs;
pub mod tasks;
pub mod ui;

use anyhow::{anyhow, Result};
use specboard_core::project::Project;
use specboard_core::registry::ProjectRegistry;
use std::path::Path;

/// Scan the root once and resolve a project by name or id.
pub async fn resolve_project(root: &Path, name_or_id: &str) -> Result<Project> {
    let registry = ProjectRegistry::new(root.to_path_buf());
    registry.scan_root().await?;
    registry
        .projects()
        .into_iter()
        .find(|p| p.name == name_or_id || p.id == name_or_id)
        .ok_or_else(|| anyhow!("no project named '{name_or_id}' under {}", root.display()))
}

/// One-shot commands run their async body on a fresh runtime.
pub fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
    let rt = tokio::runtime::Runtime::new()?;
    Ok(rt.block_on(future))
}
