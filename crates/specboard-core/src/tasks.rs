//! Task-markdown parsing: checkbox task lists grouped into phases.
//!
//! The parser is a pure function of text to structure. It never fails on
//! malformed input — lines that don't parse are skipped, so the worst case
//! is fewer tasks than the author intended.

use crate::error::{Result, SpecboardError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Task identifier, e.g. `T007`. Unique within one document by
    /// convention; the parser does not deduplicate.
    pub id: String,
    pub completed: bool,
    /// True if the line carries a `[P]` parallel marker.
    pub parallel: bool,
    /// The literal `[USn]` token if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_story: Option<String>,
    pub description: String,
    /// Raw (trimmed) source line, kept verbatim so a toggle can locate it
    /// with a literal string match.
    pub line: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    pub description: String,
    pub tasks: Vec<Task>,
}

impl Phase {
    fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            tasks: Vec::new(),
        }
    }
}

/// Completion counts across all phases of a document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TaskSummary {
    pub total: usize,
    pub completed: usize,
}

pub fn summarize(phases: &[Phase]) -> TaskSummary {
    let mut summary = TaskSummary {
        total: 0,
        completed: 0,
    };
    for phase in phases {
        summary.total += phase.tasks.len();
        summary.completed += phase.tasks.iter().filter(|t| t.completed).count();
    }
    summary
}

// ---------------------------------------------------------------------------
// Regexes
// ---------------------------------------------------------------------------

static PHASE_HEADER_RE: OnceLock<Regex> = OnceLock::new();
static CHECKBOX_RE: OnceLock<Regex> = OnceLock::new();
static BOLD_ID_RE: OnceLock<Regex> = OnceLock::new();
static PLAIN_ID_RE: OnceLock<Regex> = OnceLock::new();
static USER_STORY_RE: OnceLock<Regex> = OnceLock::new();
static SPLIT_CHECKBOX_RE: OnceLock<Regex> = OnceLock::new();
static SPLIT_PHASE_RE: OnceLock<Regex> = OnceLock::new();

fn phase_header_re() -> &'static Regex {
    PHASE_HEADER_RE.get_or_init(|| Regex::new(r"(?i)^#{1,2}\s+Phase\s+\d+").unwrap())
}

fn checkbox_re() -> &'static Regex {
    CHECKBOX_RE.get_or_init(|| Regex::new(r"^-\s*\[([xX ])\]").unwrap())
}

fn bold_id_re() -> &'static Regex {
    BOLD_ID_RE.get_or_init(|| Regex::new(r"\*\*([A-Z]+\d+)\*\*:?\s*(.+)").unwrap())
}

fn plain_id_re() -> &'static Regex {
    PLAIN_ID_RE.get_or_init(|| Regex::new(r"^-\s*\[[xX ]\]\s+([A-Z]+\d+)\s+(.+)").unwrap())
}

fn user_story_re() -> &'static Regex {
    USER_STORY_RE.get_or_init(|| Regex::new(r"\[US\d+\]").unwrap())
}

fn split_checkbox_re() -> &'static Regex {
    SPLIT_CHECKBOX_RE.get_or_init(|| Regex::new(r"([^\n])(- \[[ xX]\])").unwrap())
}

fn split_phase_re() -> &'static Regex {
    SPLIT_PHASE_RE.get_or_init(|| Regex::new(r"(?i)([^\n])(#{1,2}\s+Phase\s+\d)").unwrap())
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Re-insert line breaks lost by malformed upstream markdown.
///
/// Checkbox markers and phase headers sometimes arrive glued to the end of
/// the previous line; splitting them back apart lets the line scan below
/// stay simple. Running this on already-normalized text is a no-op.
pub fn normalize_tasks_markdown(content: &str) -> String {
    let unified = content.replace("\r\n", "\n");
    let split = split_checkbox_re().replace_all(&unified, "${1}\n${2}");
    split_phase_re()
        .replace_all(&split, "${1}\n${2}")
        .into_owned()
}

// ---------------------------------------------------------------------------
// Id extraction
// ---------------------------------------------------------------------------

/// The two supported task-id layouts, tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdFormat {
    /// `- [ ] **T001**: description`
    BoldId,
    /// `- [ ] T002 [P] [US1] description`
    PlainId,
}

const ID_FORMATS: [IdFormat; 2] = [IdFormat::BoldId, IdFormat::PlainId];

impl IdFormat {
    fn extract(self, line: &str) -> Option<(String, String)> {
        match self {
            IdFormat::BoldId => bold_id_re()
                .captures(line)
                .map(|c| (c[1].to_string(), c[2].trim().to_string())),
            IdFormat::PlainId => plain_id_re().captures(line).map(|c| {
                let description = user_story_re()
                    .replace_all(&c[2].replace("[P]", ""), "")
                    .trim()
                    .to_string();
                (c[1].to_string(), description)
            }),
        }
    }
}

fn extract_task(line: &str) -> Option<(String, String)> {
    ID_FORMATS.iter().find_map(|format| format.extract(line))
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse a tasks-markdown document into ordered phases of ordered tasks.
///
/// Phase headers (`# Phase N` / `## Phase N`) open a new phase; checkbox
/// lines become tasks in the current phase, with tasks before any header
/// collected into a synthetic `"Tasks"` phase. A phase is closed (and
/// emitted) by the next header; the trailing phase is emitted only if it
/// holds at least one task. Task lines without a recognizable id are
/// dropped.
pub fn parse_tasks_markdown(content: &str) -> Vec<Phase> {
    let normalized = normalize_tasks_markdown(content);

    let mut phases: Vec<Phase> = Vec::new();
    let mut current: Option<Phase> = None;

    for raw in normalized.lines() {
        let line = raw.trim();

        if phase_header_re().is_match(line) {
            if let Some(done) = current.take() {
                phases.push(done);
            }
            current = Some(Phase::named(line.trim_start_matches('#').trim()));
            continue;
        }

        if let Some(rest) = line
            .strip_prefix("**Purpose**:")
            .or_else(|| line.strip_prefix("**Goal**:"))
        {
            if let Some(phase) = current.as_mut() {
                phase.description = rest.trim().to_string();
            }
            continue;
        }

        if let Some(caps) = checkbox_re().captures(line) {
            let phase = current.get_or_insert_with(|| Phase::named("Tasks"));
            let Some((id, description)) = extract_task(line) else {
                continue;
            };
            phase.tasks.push(Task {
                id,
                completed: caps[1].eq_ignore_ascii_case("x"),
                parallel: line.contains("[P]"),
                user_story: user_story_re().find(line).map(|m| m.as_str().to_string()),
                description,
                line: line.to_string(),
            });
        }
    }

    if let Some(last) = current.take() {
        if !last.tasks.is_empty() {
            phases.push(last);
        }
    }

    phases
}

// ---------------------------------------------------------------------------
// Toggle
// ---------------------------------------------------------------------------

/// Flip the checkbox of the task whose raw `line` appears in `content`.
///
/// The match is a literal substring match on the verbatim line captured at
/// parse time. Returns the updated document and the toggled line.
pub fn toggle_task_line(content: &str, line: &str) -> Result<(String, String)> {
    if !content.contains(line) {
        return Err(SpecboardError::TaskLineNotFound(line.to_string()));
    }
    let caps = checkbox_re()
        .captures(line)
        .ok_or_else(|| SpecboardError::TaskLineNotFound(line.to_string()))?;
    // The first occurrence of the matched marker is the checkbox itself, so
    // a literal "[ ]" later in the description is never touched.
    let toggled = if caps[1].eq_ignore_ascii_case("x") {
        line.replacen(&format!("[{}]", &caps[1]), "[ ]", 1)
    } else {
        line.replacen("[ ]", "[x]", 1)
    };
    Ok((content.replacen(line, &toggled, 1), toggled))
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Rebuild a tasks document from parsed phases, using the same header and
/// checkbox conventions the parser accepts. Re-parsing the result yields
/// the same structure.
pub fn render_tasks_markdown(phases: &[Phase]) -> String {
    let mut out = String::new();
    for phase in phases {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("## {}\n", phase.name));
        if !phase.description.is_empty() {
            out.push_str(&format!("**Purpose**: {}\n", phase.description));
        }
        for task in &phase.tasks {
            out.push_str(&task.line);
            out.push('\n');
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "\
## Phase 1: Setup
**Purpose**: Initialize project
- [x] **T001**: Create repo
- [ ] T002 [P] [US1] Write README
";

    #[test]
    fn parses_the_reference_document() {
        let phases = parse_tasks_markdown(EXAMPLE);
        assert_eq!(phases.len(), 1);

        let phase = &phases[0];
        assert_eq!(phase.name, "Phase 1: Setup");
        assert_eq!(phase.description, "Initialize project");
        assert_eq!(phase.tasks.len(), 2);

        let t1 = &phase.tasks[0];
        assert_eq!(t1.id, "T001");
        assert!(t1.completed);
        assert!(!t1.parallel);
        assert_eq!(t1.user_story, None);
        assert_eq!(t1.description, "Create repo");

        let t2 = &phase.tasks[1];
        assert_eq!(t2.id, "T002");
        assert!(!t2.completed);
        assert!(t2.parallel);
        assert_eq!(t2.user_story.as_deref(), Some("[US1]"));
        assert_eq!(t2.description, "Write README");
    }

    #[test]
    fn tasks_before_any_header_get_a_synthetic_phase() {
        let phases = parse_tasksmd("- [ ] T001 First\n- [x] T002 Second\n");
        assert_eq!(phases.len(), 1);
        assert_eq!(phases[0].name, "Tasks");
        assert_eq!(phases[0].description, "");
        let ids: Vec<&str> = phases[0].tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["T001", "T002"]);
    }

    // Shorthand so test bodies stay readable.
    fn parse_tasksmd(s: &str) -> Vec<Phase> {
        parse_tasks_markdown(s)
    }

    #[test]
    fn trailing_empty_phase_is_dropped() {
        let phases = parse_tasksmd("## Phase 1: Work\n- [ ] T001 Do it\n## Phase 2: Later\n");
        assert_eq!(phases.len(), 1);
        assert_eq!(phases[0].name, "Phase 1: Work");
    }

    #[test]
    fn empty_intermediate_phase_is_kept() {
        // Closing on the next header has no emptiness condition; only the
        // trailing phase requires tasks.
        let phases =
            parse_tasksmd("## Phase 1: Empty\n## Phase 2: Work\n- [ ] T001 Do it\n");
        assert_eq!(phases.len(), 2);
        assert_eq!(phases[0].name, "Phase 1: Empty");
        assert!(phases[0].tasks.is_empty());
        assert_eq!(phases[1].tasks.len(), 1);
    }

    #[test]
    fn checkbox_fidelity() {
        let doc = "- [ ] T001 a\n- [x] T002 b\n- [X] T003 c\n";
        let phases = parse_tasksmd(doc);
        let tasks = &phases[0].tasks;
        assert_eq!(tasks.len(), 3);
        assert!(!tasks[0].completed);
        assert!(tasks[1].completed);
        assert!(tasks[2].completed);
    }

    #[test]
    fn task_lines_without_an_id_are_dropped() {
        let phases = parse_tasksmd("- [ ] just some note\n- [ ] T001 real task\n");
        assert_eq!(phases[0].tasks.len(), 1);
        assert_eq!(phases[0].tasks[0].id, "T001");
    }

    #[test]
    fn bold_id_wins_over_plain_id() {
        // `**T001**:` also has an id-shaped token after the checkbox; the
        // bold form must be tried first.
        let phases = parse_tasksmd("- [ ] **T001**: T999 looks like an id\n");
        assert_eq!(phases[0].tasks[0].id, "T001");
        assert_eq!(phases[0].tasks[0].description, "T999 looks like an id");
    }

    #[test]
    fn crlf_input_parses_like_lf() {
        let phases = parse_tasksmd("## Phase 1: A\r\n- [ ] T001 task\r\n");
        assert_eq!(phases.len(), 1);
        assert_eq!(phases[0].tasks.len(), 1);
    }

    #[test]
    fn glued_checkboxes_are_split_apart() {
        let phases = parse_tasksmd("- [ ] T001 first- [x] T002 second\n");
        let tasks = &phases[0].tasks;
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, "T001");
        assert!(!tasks[0].completed);
        assert_eq!(tasks[1].id, "T002");
        assert!(tasks[1].completed);
    }

    #[test]
    fn glued_phase_header_is_split_apart() {
        let phases = parse_tasksmd("- [ ] T001 first## Phase 2: Next\n- [ ] T002 second\n");
        assert_eq!(phases.len(), 2);
        assert_eq!(phases[0].name, "Tasks");
        assert_eq!(phases[1].name, "Phase 2: Next");
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_tasks_markdown("intro- [ ] T001 a## Phase 2\n- [x] T002 b\n");
        let twice = normalize_tasks_markdown(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn malformed_input_never_panics() {
        for doc in [
            "",
            "# \n",
            "- [ ]",
            "- [?] T001 bad box",
            "## Phase\n",
            "**Purpose**: orphan description\n",
            "- [ ] **broken bold T001\n",
        ] {
            let _ = parse_tasksmd(doc);
        }
    }

    #[test]
    fn raw_line_is_preserved_verbatim() {
        let phases = parse_tasksmd("   - [ ] T001 [P] indented task\n");
        assert_eq!(phases[0].tasks[0].line, "- [ ] T001 [P] indented task");
    }

    #[test]
    fn toggle_round_trip_inverts_completed_only() {
        let phases = parse_tasksmd(EXAMPLE);
        let before = phases[0].tasks[1].clone();

        let (updated, _) = toggle_task_line(EXAMPLE, &before.line).unwrap();
        let after = parse_tasksmd(&updated)[0].tasks[1].clone();

        assert_eq!(after.id, before.id);
        assert_eq!(after.description, before.description);
        assert_eq!(after.parallel, before.parallel);
        assert_eq!(after.user_story, before.user_story);
        assert_eq!(after.completed, !before.completed);
    }

    #[test]
    fn toggle_unchecks_completed_tasks() {
        let (updated, line) = toggle_task_line(EXAMPLE, "- [x] **T001**: Create repo").unwrap();
        assert_eq!(line, "- [ ] **T001**: Create repo");
        assert!(updated.contains("- [ ] **T001**: Create repo"));
    }

    #[test]
    fn toggle_only_touches_the_checkbox_marker() {
        let doc = "- [x] T001 render [ ] placeholders\n";
        let line = &parse_tasksmd(doc)[0].tasks[0].line;
        let (updated, toggled) = toggle_task_line(doc, line).unwrap();
        assert_eq!(toggled, "- [ ] T001 render [ ] placeholders");
        assert!(updated.starts_with("- [ ] T001 render [ ] placeholders"));
    }

    #[test]
    fn toggle_missing_line_errors() {
        let err = toggle_task_line(EXAMPLE, "- [ ] T999 not in document").unwrap_err();
        assert!(matches!(err, SpecboardError::TaskLineNotFound(_)));
    }

    #[test]
    fn render_then_parse_is_stable() {
        let phases = parse_tasksmd(EXAMPLE);
        let rendered = render_tasks_markdown(&phases);
        let reparsed = parse_tasksmd(&rendered);
        assert_eq!(
            serde_json::to_value(&phases).unwrap(),
            serde_json::to_value(&reparsed).unwrap()
        );
    }

    #[test]
    fn summarize_counts_across_phases() {
        let doc = "## Phase 1: A\n- [x] T001 a\n- [ ] T002 b\n## Phase 2: B\n- [x] T003 c\n";
        let summary = summarize(&parse_tasksmd(doc));
        assert_eq!(summary.total, 3);
        assert_eq!(summary.completed, 2);
    }
}
