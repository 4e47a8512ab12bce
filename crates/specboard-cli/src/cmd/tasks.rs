use crate::output::{print_json, print_table};
use anyhow::Result;
use clap::Subcommand;
use specboard_core::{specfiles, tasks};
use std::path::Path;

#[derive(Subcommand)]
pub enum TasksSubcommand {
    /// List tasks for a feature, grouped by phase
    List {
        /// Project name or id
        project: String,
        /// Feature directory, e.g. 001-auth
        feature: String,
    },
    /// Toggle a task's checkbox
    Toggle {
        /// Project name or id
        project: String,
        /// Feature directory, e.g. 001-auth
        feature: String,
        /// Task id, e.g. T007
        task_id: String,
    },
}

pub fn run(root: &Path, subcmd: TasksSubcommand, json: bool) -> Result<()> {
    match subcmd {
        TasksSubcommand::List { project, feature } => list(root, &project, &feature, json),
        TasksSubcommand::Toggle {
            project,
            feature,
            task_id,
        } => toggle(root, &project, &feature, &task_id, json),
    }
}

fn list(root: &Path, project: &str, feature: &str, json: bool) -> Result<()> {
    let (project, phases) = super::block_on(async {
        let project = super::resolve_project(root, project).await?;
        let phases = specfiles::load_tasks(&project.path, feature)?;
        Ok::<_, anyhow::Error>((project, phases))
    })??;

    if json {
        return print_json(&phases);
    }

    let summary = tasks::summarize(&phases);
    println!(
        "{} / {} — {}/{} tasks complete",
        project.name, feature, summary.completed, summary.total
    );
    for phase in &phases {
        println!();
        println!("{}", phase.name);
        if !phase.description.is_empty() {
            println!("  {}", phase.description);
        }
        let headers = &["ID", "DONE", "PAR", "STORY", "DESCRIPTION"];
        let rows: Vec<Vec<String>> = phase
            .tasks
            .iter()
            .map(|t| {
                vec![
                    t.id.clone(),
                    if t.completed { "x" } else { " " }.to_string(),
                    if t.parallel { "P" } else { " " }.to_string(),
                    t.user_story.clone().unwrap_or_default(),
                    t.description.clone(),
                ]
            })
            .collect();
        print_table(headers, rows);
    }
    Ok(())
}

fn toggle(root: &Path, project: &str, feature: &str, task_id: &str, json: bool) -> Result<()> {
    let phases = super::block_on(async {
        let project = super::resolve_project(root, project).await?;
        let phases = specfiles::toggle_task(&project.path, feature, task_id)?;
        Ok::<_, anyhow::Error>(phases)
    })??;

    if json {
        return print_json(&phases);
    }

    let toggled = phases
        .iter()
        .flat_map(|p| p.tasks.iter())
        .find(|t| t.id == task_id);
    match toggled {
        Some(task) if task.completed => println!("{task_id} marked complete"),
        Some(_) => println!("{task_id} marked incomplete"),
        None => println!("{task_id} toggled"),
    }
    Ok(())
}
