//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SCREENING: &str = r#"
[test]
id = "screening"
name = "Backend Screening"
description = "HTTP and SQL fundamentals"

[[mcq]]
id = "q1"
prompt = "Which HTTP method is idempotent?"
options = ["POST", "PUT", "PATCH"]
correct = 1

[[mcq]]
id = "q2"
prompt = "Which SQL clause filters groups?"
options = ["WHERE", "HAVING"]
correct = 1

[[coding]]
id = "c1"
prompt = "Reverse a string."
language = "python"
"#;

/// A command isolated to `dir`: no user config, data under `dir/data`.
fn proctor(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("proctor").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("PROCTOR_DATA_DIR", dir.join("data"))
        .env_remove("PROCTOR_BUDGET_SECONDS");
    cmd
}

fn workspace_with_test() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("screening.toml"), SCREENING).unwrap();
    proctor(dir.path())
        .args(["import", "--file", "screening.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported Backend Screening (screening)"));
    dir
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    proctor(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Timed assessment session runner"));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    proctor(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("proctor"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    proctor(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created proctor.toml"))
        .stdout(predicate::str::contains("Created assessments/example.toml"));

    assert!(dir.path().join("proctor.toml").exists());
    assert!(dir.path().join("assessments/example.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    proctor(dir.path()).arg("init").assert().success();

    proctor(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn init_example_is_valid() {
    let dir = TempDir::new().unwrap();
    proctor(dir.path()).arg("init").assert().success();

    proctor(dir.path())
        .args(["validate", "--file", "assessments/example.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Example Screening (3 questions)"))
        .stdout(predicate::str::contains("All tests valid"));
}

#[test]
fn validate_reports_errors() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("bad.toml"),
        "[test]\nname = \"Bad\"\n\n[[mcq]]\nid = \"q1\"\nprompt = \"Pick\"\noptions = [\"a\", \"b\"]\ncorrect = 5\n",
    )
    .unwrap();

    proctor(dir.path())
        .args(["validate", "--file", "bad.toml"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[q1] ERROR: correct option 5 is out of range"))
        .stderr(predicate::str::contains("1 error(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    let dir = TempDir::new().unwrap();
    proctor(dir.path())
        .args(["validate", "--file", "nonexistent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn import_rejects_duplicate_id() {
    let dir = workspace_with_test();
    proctor(dir.path())
        .args(["import", "--file", "screening.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn import_directory_with_conflict_changes_nothing() {
    let dir = workspace_with_test();
    let batch = dir.path().join("batch");
    std::fs::create_dir(&batch).unwrap();
    std::fs::write(
        batch.join("a_fresh.toml"),
        SCREENING
            .replace("id = \"screening\"", "id = \"fresh\"")
            .replace("Backend Screening", "Fresh Test"),
    )
    .unwrap();
    std::fs::write(batch.join("b_clash.toml"), SCREENING).unwrap();

    proctor(dir.path())
        .args(["import", "--file", "batch"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Imported").not())
        .stderr(predicate::str::contains("nothing was imported"));

    proctor(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Backend Screening"))
        .stdout(predicate::str::contains("Fresh Test").not());
}

#[test]
fn list_shows_catalog() {
    let dir = workspace_with_test();
    proctor(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Backend Screening"))
        .stdout(predicate::str::contains("not taken"));

    proctor(dir.path())
        .args(["list", "--search", "frontend"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tests match 'frontend'"));
}

#[test]
fn list_empty_catalog() {
    let dir = TempDir::new().unwrap();
    proctor(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tests found"));
}

#[test]
fn remove_test() {
    let dir = workspace_with_test();
    proctor(dir.path())
        .args(["remove", "--id", "screening"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed test screening"));

    proctor(dir.path())
        .args(["remove", "--id", "screening"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("test not found: screening"));
}

#[test]
fn take_unknown_test_fails() {
    let dir = TempDir::new().unwrap();
    proctor(dir.path())
        .args(["take", "--id", "missing"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("test not found: missing"));
}

#[test]
fn take_and_report() {
    let dir = workspace_with_test();

    proctor(dir.path())
        .args(["take", "--id", "screening"])
        .write_stdin("answer 2\nsubmit\nconfirm\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("MCQ 1/2: Which HTTP method is idempotent?"))
        .stdout(predicate::str::contains("You answered 1/2 multiple-choice"))
        .stdout(predicate::str::contains("Submitted. MCQ score: 1/2"));

    proctor(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("completed"))
        .stdout(predicate::str::contains("1/2 (50%)"));

    proctor(dir.path())
        .args(["report", "--id", "screening"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Score:      1/2 (50%)  Grade D"))
        .stdout(predicate::str::contains("Completion: 33% (1 of 3 answered)"));

    let output = proctor(dir.path())
        .args(["report", "--id", "screening", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["report"]["grade"], "D");
    assert_eq!(doc["report"]["mcqOutcomes"][0]["isCorrect"], true);
}

#[test]
fn report_to_html_file() {
    let dir = workspace_with_test();
    proctor(dir.path())
        .args(["take", "--id", "screening"])
        .write_stdin("coding\ncode print(s[::-1])\nconfirm\n")
        .assert()
        .success();

    proctor(dir.path())
        .args([
            "report",
            "--id",
            "screening",
            "--format",
            "html",
            "--output",
            "out/report.html",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to out/report.html"));

    let html = std::fs::read_to_string(dir.path().join("out/report.html")).unwrap();
    assert!(html.contains("print(s[::-1])"));
}

#[test]
fn report_to_markdown_and_json_files() {
    let dir = workspace_with_test();
    proctor(dir.path())
        .args(["take", "--id", "screening"])
        .write_stdin("answer 2\nconfirm\n")
        .assert()
        .success();

    proctor(dir.path())
        .args(["report", "--id", "screening", "--format", "md", "--output", "out/report.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to out/report.md"));
    let md = std::fs::read_to_string(dir.path().join("out/report.md")).unwrap();
    assert!(md.starts_with("# Results: Backend Screening"));

    proctor(dir.path())
        .args(["report", "--id", "screening", "--format", "json", "--output", "out/report.json"])
        .assert()
        .success();
    let raw = std::fs::read_to_string(dir.path().join("out/report.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(doc["report"]["mcqScore"], 1);
    assert_eq!(doc["report"]["testId"], "screening");
}

#[test]
fn quitting_leaves_no_submission() {
    let dir = workspace_with_test();
    proctor(dir.path())
        .args(["take", "--id", "screening"])
        .write_stdin("answer 2\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Left the session without submitting"));

    proctor(dir.path())
        .args(["report", "--id", "screening"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("results not found for test screening"));
}

#[test]
fn unknown_console_command_is_reported() {
    let dir = workspace_with_test();
    proctor(dir.path())
        .args(["take", "--id", "screening"])
        .write_stdin("dance\nanswer 9\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("unknown command 'dance'"))
        .stdout(predicate::str::contains("Rejected: invalid option 8"));
}

#[test]
fn report_unknown_format() {
    let dir = workspace_with_test();
    proctor(dir.path())
        .args(["take", "--id", "screening"])
        .write_stdin("confirm\n")
        .assert()
        .success();
    proctor(dir.path())
        .args(["report", "--id", "screening", "--format", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format: pdf"));
}

#[test]
fn budget_comes_from_config_file() {
    let dir = workspace_with_test();
    std::fs::write(
        dir.path().join("custom.toml"),
        "[session]\nbudget_seconds = 125\n",
    )
    .unwrap();
    proctor(dir.path())
        .args(["--config", "custom.toml", "take", "--id", "screening"])
        .write_stdin("quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("2:05 on the clock"));
}
