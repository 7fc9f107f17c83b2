//! CLI integration tests
//!
//! Runs the `cmdflow` binary on small histories and checks the DOT, JSON
//! and text outputs plus the error paths.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const SMALL_HISTORY: &str = "1 status\n2 add\n3 commit\n4 push\n5 status\n6 add\n7 commit\n";

fn cmdflow() -> Command {
    Command::cargo_bin("cmdflow").unwrap()
}

#[test]
fn test_dot_from_stdin() {
    cmdflow()
        .write_stdin(SMALL_HISTORY)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph cmdflow {"))
        .stdout(predicate::str::contains("\"add\" -> \"commit\""))
        .stdout(predicate::str::contains("label=\"status\\n29%\""))
        .stdout(predicate::str::contains("subgraph cluster_main"));
}

#[test]
fn test_dot_from_file_is_deterministic() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("history.txt");
    fs::write(&input, SMALL_HISTORY).unwrap();

    let first = cmdflow().arg(&input).output().unwrap();
    let second = cmdflow().arg(&input).output().unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_dash_reads_stdin() {
    cmdflow()
        .arg("-")
        .write_stdin(SMALL_HISTORY)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"commit\" -> \"push\""));
}

#[test]
fn test_empty_graph_fails_for_dot() {
    cmdflow()
        .write_stdin("1 status\n3 add\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Graph is empty!"));
}

#[test]
fn test_empty_input_fails_for_dot() {
    cmdflow()
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Graph is empty!"));
}

#[test]
fn test_json_output() {
    let output = cmdflow()
        .args(["--format", "json"])
        .write_stdin(SMALL_HISTORY)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["format"], "cmdflow-json-v1");
    assert_eq!(json["summary"]["events"], 7);
    assert_eq!(json["summary"]["transition_volume"], 6);
    assert_eq!(json["summary"]["drawn_transitions"], 4);
    assert_eq!(json["summary"]["policy"], "dense");
    assert_eq!(json["graph"]["nodes"].as_array().unwrap().len(), 4);
    assert_eq!(json["graph"]["edges"][0]["from"], "add");
    assert_eq!(json["graph"]["edges"][0]["count"], 2);
}

#[test]
fn test_json_empty_graph_is_null() {
    let output = cmdflow()
        .args(["--format", "json"])
        .write_stdin("1 status\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["graph"].is_null());
    assert_eq!(json["summary"]["events"], 1);
}

#[test]
fn test_text_summary() {
    cmdflow()
        .args(["--format", "text"])
        .write_stdin(SMALL_HISTORY)
        .assert()
        .success()
        .stdout(predicate::str::contains("% share     calls command"))
        .stdout(predicate::str::contains("4 of 4 transitions drawn (dense policy"))
        .stdout(predicate::str::contains("add -> commit"));
}

#[test]
fn test_text_summary_reports_empty_graph() {
    cmdflow()
        .args(["--format", "text"])
        .write_stdin("1 status\n3 add\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Graph is empty!"));
}

#[test]
fn test_sparse_flag_drops_rare_transitions() {
    let mut history = String::new();
    for i in 0..150 {
        history.push_str(&format!("{} status\n{} add\n", i * 2 + 1, i * 2 + 2));
    }
    history.push_str("301 stash\n");

    cmdflow()
        .write_stdin(history.clone())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"add\" -> \"stash\""));

    cmdflow()
        .arg("--sparse")
        .write_stdin(history)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"add\" -> \"stash\"").not())
        .stdout(predicate::str::contains("\"status\" -> \"add\""));
}

#[test]
fn test_max_transitions_flag() {
    let output = cmdflow()
        .args(["--format", "json", "--max-transitions", "1"])
        .write_stdin(SMALL_HISTORY)
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["drawn_transitions"], 1);
}

#[test]
fn test_output_file() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("graph.dot");

    cmdflow()
        .arg("-o")
        .arg(&out)
        .write_stdin(SMALL_HISTORY)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let dot = fs::read_to_string(&out).unwrap();
    assert!(dot.starts_with("digraph cmdflow {"));
}

#[test]
fn test_caption_flag() {
    cmdflow()
        .args(["--caption", "my git habits"])
        .write_stdin(SMALL_HISTORY)
        .assert()
        .success()
        .stdout(predicate::str::contains("label=\"my git habits\""));
}

#[test]
fn test_config_file() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("cmdflow.toml");
    fs::write(
        &config,
        "[policy]\nmode = \"sparse\"\n\n[graph]\ncaption = \"from config\"\nframed = false\n",
    )
    .unwrap();

    cmdflow()
        .arg("--config")
        .arg(&config)
        .write_stdin(SMALL_HISTORY)
        .assert()
        .success()
        .stdout(predicate::str::contains("from config"))
        .stdout(predicate::str::contains("cluster_main").not());
}

#[test]
fn test_invalid_config_rejected() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("cmdflow.toml");
    fs::write(&config, "[policy]\nsparse_share = 2.0\n").unwrap();

    cmdflow()
        .arg("--config")
        .arg(&config)
        .write_stdin(SMALL_HISTORY)
        .assert()
        .failure()
        .stderr(predicate::str::contains("sparse_share"));
}

#[test]
fn test_print_config() {
    cmdflow()
        .args(["--print-config", "--sparse"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[policy]"))
        .stdout(predicate::str::contains("mode = \"sparse\""))
        .stdout(predicate::str::contains("dense_volume_cutoff = 1000"));
}

#[test]
fn test_missing_input_file() {
    cmdflow()
        .arg("/nonexistent/history.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_git_mode_with_aliases() {
    let tmp = TempDir::new().unwrap();
    let bash = tmp.path().join("aliases.txt");
    let git = tmp.path().join("git-aliases.txt");
    fs::write(&bash, "alias gs='git status'\nalias ll='ls -l'\n").unwrap();
    fs::write(&git, "alias.ci commit\n").unwrap();

    let history = "  1  gs\n  2  git add .\n  3  git ci -m wip\n  4  git push\n  5  ll\n";

    cmdflow()
        .arg("--git")
        .arg("--bash-aliases")
        .arg(&bash)
        .arg("--git-aliases")
        .arg(&git)
        .write_stdin(history)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\" -> \"add\""))
        .stdout(predicate::str::contains("\"add\" -> \"commit\""))
        .stdout(predicate::str::contains("\"commit\" -> \"push\""));
}

#[test]
fn test_git_mode_reports_unknown_commands() {
    let history = "1 git add .\n2 git lfs pull\n3 git commit\n4 git lfs push\n5 git push\n";

    cmdflow()
        .arg("--git")
        .write_stdin(history)
        .assert()
        .success()
        .stderr(predicate::str::contains("Kept unknown commands: lfs"));

    cmdflow()
        .args(["--git", "--drop-unknown", "--format", "text"])
        .write_stdin(history)
        .assert()
        .success()
        .stderr(predicate::str::contains("Kept unknown").not())
        .stdout(predicate::str::contains("Graph is empty!"));
}

#[test]
fn test_save_history_writes_cleaned_events() {
    let tmp = TempDir::new().unwrap();
    let saved = tmp.path().join("events.txt");

    cmdflow()
        .arg("--git")
        .arg("--save-history")
        .arg(&saved)
        .write_stdin("  10  git status\n  11  ls\n  12  git add .\n  13  git commit\n")
        .assert()
        .success();

    let text = fs::read_to_string(&saved).unwrap();
    assert_eq!(text, "10 status\n12 add\n13 commit\n");
}

#[test]
fn test_invalid_format_rejected() {
    cmdflow()
        .args(["--format", "svg"])
        .write_stdin(SMALL_HISTORY)
        .assert()
        .failure();
}
