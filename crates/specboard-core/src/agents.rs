//! Agent definition files: `.claude/agents/*.md` with YAML frontmatter.

use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentFile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub path: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct AgentFrontmatter {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Extract the YAML content between the first pair of `---` delimiters.
fn extract_frontmatter(content: &str) -> Option<&str> {
    let rest = content.strip_prefix("---")?;
    let rest = if let Some(r) = rest.strip_prefix('\n') {
        r
    } else if let Some(r) = rest.strip_prefix("\r\n") {
        r
    } else {
        return None;
    };
    let end = rest.find("\n---")?;
    Some(&rest[..end])
}

fn parse_frontmatter(content: &str) -> AgentFrontmatter {
    extract_frontmatter(content)
        .and_then(|fm| serde_yaml::from_str(fm).ok())
        .unwrap_or_default()
}

/// Enumerate agent files, name order. Missing agents directory means no
/// agents; malformed frontmatter falls back to the file stem.
pub fn list_agents(project: &Path) -> Result<Vec<AgentFile>> {
    let dir = paths::agents_dir(project);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut agents = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let frontmatter = std::fs::read_to_string(&path)
            .map(|content| parse_frontmatter(&content))
            .unwrap_or_default();
        agents.push(AgentFile {
            name: frontmatter.name.unwrap_or(stem),
            description: frontmatter.description,
            path,
        });
    }
    agents.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(agents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
