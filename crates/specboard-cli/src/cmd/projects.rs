use crate::output::{print_json, print_table};
use anyhow::Result;
use specboard_core::registry::ProjectRegistry;
use std::path::Path;

/// Scan the root and print discovered projects.
pub fn run(root: &Path, json: bool) -> Result<()> {
    let projects = super::block_on(async {
        let registry = ProjectRegistry::new(root.to_path_buf());
        registry.scan_root().await?;
        Ok::<_, specboard_core::SpecboardError>(registry.projects())
    })??;

    if json {
        return print_json(&projects);
    }

    if projects.is_empty() {
        println!("No projects found under {}", root.display());
        return Ok(());
    }

    let headers = &["ID", "NAME", "TYPE", "PATH"];
    let rows: Vec<Vec<String>> = projects
        .iter()
        .map(|p| {
            vec![
                p.id.clone(),
                p.name.clone(),
                p.project_type.to_string(),
                p.path.display().to_string(),
            ]
        })
        .collect();
    print_table(headers, rows);
    Ok(())
}
