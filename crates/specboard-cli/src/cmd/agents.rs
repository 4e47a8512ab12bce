use crate::output::{print_json, print_table};
use anyhow::Result;
use specboard_core::agents;
use std::path::Path;

/// List agent definition files for a project.
pub fn run(root: &Path, project: &str, json: bool) -> Result<()> {
    let list = super::block_on(async {
        let project = super::resolve_project(root, project).await?;
        let list = agents::list_agents(&project.path)?;
        Ok::<_, anyhow::Error>(list)
    })??;

    if json {
        return print_json(&list);
    }

    if list.is_empty() {
        println!("No agents defined.");
        return Ok(());
    }

    let headers = &["NAME", "DESCRIPTION", "FILE"];
    let rows: Vec<Vec<String>> = list
        .iter()
        .map(|a| {
            vec![
                a.name.clone(),
                a.description.clone().unwrap_or_default(),
                a.path.display().to_string(),
            ]
        })
        .collect();
    print_table(headers, rows);
    Ok(())
}
