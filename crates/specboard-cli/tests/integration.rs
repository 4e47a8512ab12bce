#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const TASKS: &str = "\
## Phase 1: Setup
**Purpose**: Initialize project
- [x] **T001**: Create repo
- [ ] T002 [P] [US1] Write README
";

fn specboard(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("specboard").unwrap();
    cmd.current_dir(dir.path()).env("SPECBOARD_ROOT", dir.path());
    cmd
}

/// Lay out a root with one spec-kit project `alpha` and one plain dir.
fn seed_root(dir: &TempDir) {
    let feature = dir.path().join("alpha/specs/001-auth");
    std::fs::create_dir_all(&feature).unwrap();
    std::fs::create_dir_all(dir.path().join("alpha/.specify/memory")).unwrap();
    std::fs::write(feature.join("tasks.md"), TASKS).unwrap();
    std::fs::write(feature.join("spec.md"), "# Auth spec\n").unwrap();
    std::fs::write(
        dir.path().join("alpha/.specify/memory/constitution.md"),
        "# Constitution\n",
    )
    .unwrap();
    std::fs::create_dir_all(dir.path().join("scratch/src")).unwrap();
}

// ---------------------------------------------------------------------------
// specboard scan / projects
// ---------------------------------------------------------------------------

#[test]
fn scan_lists_discovered_projects() {
    let dir = TempDir::new().unwrap();
    seed_root(&dir);

    specboard(&dir)
        .arg("scan")
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha"))
        .stdout(predicate::str::contains("spec-kit"))
        .stdout(predicate::str::contains("scratch").not());
}

#[test]
fn scan_json_outputs_project_records() {
    let dir = TempDir::new().unwrap();
    seed_root(&dir);

    let output = specboard(&dir).args(["scan", "--json"]).output().unwrap();
    assert!(output.status.success());

    let projects: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let list = projects.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "alpha");
    assert_eq!(list[0]["project_type"], "spec-kit");
    assert_eq!(list[0]["id"].as_str().unwrap().len(), 16);
}

#[test]
fn empty_root_reports_no_projects() {
    let dir = TempDir::new().unwrap();

    specboard(&dir)
        .arg("projects")
        .assert()
        .success()
        .stdout(predicate::str::contains("No projects found"));
}

// ---------------------------------------------------------------------------
// specboard tasks
// ---------------------------------------------------------------------------

#[test]
fn tasks_list_shows_phases_and_tasks() {
    let dir = TempDir::new().unwrap();
    seed_root(&dir);

    specboard(&dir)
        .args(["tasks", "list", "alpha", "001-auth"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Phase 1: Setup"))
        .stdout(predicate::str::contains("T001"))
        .stdout(predicate::str::contains("Write README"))
        .stdout(predicate::str::contains("1/2 tasks complete"));
}

#[test]
fn tasks_toggle_persists_to_disk() {
    let dir = TempDir::new().unwrap();
    seed_root(&dir);

    specboard(&dir)
        .args(["tasks", "toggle", "alpha", "001-auth", "T002"])
        .assert()
        .success()
        .stdout(predicate::str::contains("T002 marked complete"));

    let on_disk =
        std::fs::read_to_string(dir.path().join("alpha/specs/001-auth/tasks.md")).unwrap();
    assert!(on_disk.contains("- [x] T002 [P] [US1] Write README"));

    specboard(&dir)
        .args(["tasks", "toggle", "alpha", "001-auth", "T002"])
        .assert()
        .success()
        .stdout(predicate::str::contains("T002 marked incomplete"));
}

#[test]
fn tasks_toggle_unknown_id_fails() {
    let dir = TempDir::new().unwrap();
    seed_root(&dir);

    specboard(&dir)
        .args(["tasks", "toggle", "alpha", "001-auth", "T999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("task not found"));
}

#[test]
fn unknown_project_fails_with_message() {
    let dir = TempDir::new().unwrap();
    seed_root(&dir);

    specboard(&dir)
        .args(["tasks", "list", "ghost", "001-auth"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no project named 'ghost'"));
}

// ---------------------------------------------------------------------------
// specboard specs
// ---------------------------------------------------------------------------

#[test]
fn specs_show_prints_file_content() {
    let dir = TempDir::new().unwrap();
    seed_root(&dir);

    specboard(&dir)
        .args(["specs", "show", "alpha", "001-auth", "spec.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Auth spec"));
}

#[test]
fn specs_show_rejects_disallowed_filename() {
    let dir = TempDir::new().unwrap();
    seed_root(&dir);

    specboard(&dir)
        .args(["specs", "show", "alpha", "001-auth", "secrets.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an editable spec file"));
}

#[test]
fn specs_constitution_prints_content() {
    let dir = TempDir::new().unwrap();
    seed_root(&dir);

    specboard(&dir)
        .args(["specs", "constitution", "alpha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Constitution"));
}

// ---------------------------------------------------------------------------
// specboard agents
// ---------------------------------------------------------------------------

#[test]
fn agents_lists_frontmatter_names() {
    let dir = TempDir::new().unwrap();
    seed_root(&dir);
    let agents_dir = dir.path().join("alpha/.claude/agents");
    std::fs::create_dir_all(&agents_dir).unwrap();
    std::fs::write(
        agents_dir.join("reviewer.md"),
        "---\nname: code-reviewer\ndescription: Reviews diffs\n---\n",
    )
    .unwrap();

    specboard(&dir)
        .args(["agents", "alpha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("code-reviewer"))
        .stdout(predicate::str::contains("Reviews diffs"));
}

#[test]
fn agents_handles_project_without_agents() {
    let dir = TempDir::new().unwrap();
    seed_root(&dir);

    specboard(&dir)
        .args(["agents", "alpha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No agents defined."));
}
