use crate::output::print_json;
use anyhow::Result;
use clap::Subcommand;
use specboard_core::specfiles;
use std::path::Path;

#[derive(Subcommand)]
pub enum SpecsSubcommand {
    /// Print a spec file
    Show {
        /// Project name or id
        project: String,
        /// Feature directory, e.g. 001-auth
        feature: String,
        /// Allow-listed filename, e.g. spec.md
        filename: String,
    },
    /// Print the project constitution
    Constitution {
        /// Project name or id
        project: String,
    },
}

pub fn run(root: &Path, subcmd: SpecsSubcommand, json: bool) -> Result<()> {
    match subcmd {
        SpecsSubcommand::Show {
            project,
            feature,
            filename,
        } => show(root, &project, &feature, &filename, json),
        SpecsSubcommand::Constitution { project } => constitution(root, &project, json),
    }
}

fn show(root: &Path, project: &str, feature: &str, filename: &str, json: bool) -> Result<()> {
    let content = super::block_on(async {
        let project = super::resolve_project(root, project).await?;
        let content = specfiles::read_spec_file(&project.path, feature, filename)?;
        Ok::<_, anyhow::Error>(content)
    })??;

    if json {
        return print_json(&serde_json::json!({
            "feature": feature,
            "filename": filename,
            "content": content,
        }));
    }
    print!("{content}");
    Ok(())
}

fn constitution(root: &Path, project: &str, json: bool) -> Result<()> {
    let content = super::block_on(async {
        let project = super::resolve_project(root, project).await?;
        let content = specfiles::read_constitution(&project.path)?;
        Ok::<_, anyhow::Error>(content)
    })??;

    if json {
        return print_json(&serde_json::json!({ "content": content }));
    }
    print!("{content}");
    Ok(())
}
