//! Integration tests for the scriptorium CLI
//!
//! These tests run the actual binary against the fixtures in
//! `tests/fixtures` to verify:
//! - Card validation verdicts, reasons and the all-or-nothing exit code
//! - IVTFF extraction
//! - Deterministic, seed-sensitive generation
//! - Normal vs neutral comparison and standalone scoring
//!
//! Each test uses its own temp directory as working directory.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Path to the test fixtures directory
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Copy fixtures to a temp directory and return the temp dir
fn create_test_workspace() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    for entry in std::fs::read_dir(fixtures_path()).expect("Failed to read fixtures") {
        let path = entry.expect("Failed to read entry").path();
        if path.is_file() {
            let filename = path.file_name().unwrap();
            std::fs::copy(&path, temp_dir.path().join(filename))
                .expect("Failed to copy fixture file");
        }
    }
    temp_dir
}

fn scriptorium(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_scriptorium"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute scriptorium")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("Invalid JSON ({}): {}", e, stdout))
}

// ============================================================================
// validate
// ============================================================================

#[test]
fn test_validate_valid_cards_passes() {
    let ws = create_test_workspace();
    let output = scriptorium(ws.path(), &["validate", "cards_valid.jsonl"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("PASS"));
    assert!(stdout.contains("3 record(s)"));
}

#[test]
fn test_validate_invalid_cards_fails_whole_file() {
    let ws = create_test_workspace();
    let output = scriptorium(ws.path(), &["validate", "cards_invalid.jsonl", "-f", "json"]);
    assert_eq!(output.status.code(), Some(1));

    let report = stdout_json(&output);
    let records = report["files"][0]["records"].as_array().unwrap();
    assert_eq!(records.len(), 5);

    let verdicts: Vec<&str> = records.iter().map(|r| r["verdict"].as_str().unwrap()).collect();
    assert_eq!(verdicts, vec!["accept", "reject", "reject", "reject", "reject"]);

    // empty locator: a policy violation naming the locator
    assert_eq!(records[1]["id"], "macer_002_viola");
    assert!(records[1]["reasons"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["message"] == "missing locator" && r["kind"] == "policy"));

    // bad domain: structural
    assert!(records[2]["reasons"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["kind"] == "malformed" && r["message"].as_str().unwrap().contains("alchemy")));

    // unparseable line: malformed, no id, but still counted with its line number
    assert_eq!(records[3]["line"], 4);
    assert!(records[3]["id"].is_null());
    assert_eq!(records[3]["reasons"][0]["rule"], "parse");

    // absolute claim without a rhetorical marker
    assert!(records[4]["reasons"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["rule"] == "undisclosed-absolute-claim"));
}

#[test]
fn test_validate_several_files_fails_if_any_fails() {
    let ws = create_test_workspace();
    let output = scriptorium(
        ws.path(),
        &["validate", "cards_valid.jsonl", "cards_invalid.jsonl", "-f", "json"],
    );
    assert_eq!(output.status.code(), Some(1));
    let report = stdout_json(&output);
    let files = report["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["path"], "cards_valid.jsonl");
}

#[test]
fn test_validate_duplicate_ids_fail_file() {
    let ws = create_test_workspace();
    let first_line = std::fs::read_to_string(ws.path().join("cards_valid.jsonl"))
        .unwrap()
        .lines()
        .next()
        .unwrap()
        .to_string();
    std::fs::write(
        ws.path().join("dup.jsonl"),
        format!("{}\n{}\n", first_line, first_line),
    )
    .unwrap();

    let output = scriptorium(ws.path(), &["validate", "dup.jsonl", "-f", "json"]);
    assert_eq!(output.status.code(), Some(1));
    let report = stdout_json(&output);
    assert_eq!(report["files"][0]["duplicate_ids"][0]["id"], "macer_001_rosa");
    assert_eq!(report["files"][0]["duplicate_ids"][0]["lines"], serde_json::json!([1, 2]));
    assert!(report["files"][0]["records"]
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["verdict"] == "accept"));
}

#[test]
fn test_validate_missing_file_errors() {
    let ws = create_test_workspace();
    let output = scriptorium(ws.path(), &["validate", "absent.jsonl"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("absent.jsonl"));
}

// ============================================================================
// init
// ============================================================================

#[test]
fn test_init_writes_loadable_config_once() {
    let ws = tempfile::tempdir().unwrap();
    let output = scriptorium(ws.path(), &["init"]);
    assert!(output.status.success());
    let config = ws.path().join("scriptorium.toml");
    assert!(config.exists());

    let again = scriptorium(ws.path(), &["init"]);
    assert!(!again.status.success());
    assert!(String::from_utf8_lossy(&again.stderr).contains("already exists"));

    // the written template must load as an explicit config
    let check = scriptorium(
        ws.path(),
        &["--config", "scriptorium.toml", "score", "-r", "scriptorium.toml", "-g", "scriptorium.toml"],
    );
    assert!(
        check.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&check.stderr)
    );
}

// ============================================================================
// extract
// ============================================================================

#[test]
fn test_extract_ivtff() {
    let ws = create_test_workspace();
    let output = scriptorium(ws.path(), &["extract", "-i", "sample.ivtff", "-o", "out/ref.txt"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let extracted = std::fs::read_to_string(ws.path().join("out/ref.txt")).unwrap();
    let lines: Vec<&str> = extracted.lines().collect();
    assert_eq!(lines.len(), 7);
    assert!(lines.contains(&"fachys.ykal.ar.ataiin.shol.shory.cth res.y.kor.sholdy"));
    assert!(lines.iter().all(|l| l
        .chars()
        .all(|c| c.is_ascii_lowercase() || c == '.' || c == ' ')));
}

#[test]
fn test_extract_respects_max_lines() {
    let ws = create_test_workspace();
    let output = scriptorium(
        ws.path(),
        &["extract", "-i", "sample.ivtff", "-o", "ref.txt", "--max-lines", "3"],
    );
    assert!(output.status.success());
    let extracted = std::fs::read_to_string(ws.path().join("ref.txt")).unwrap();
    assert_eq!(extracted.lines().count(), 3);
}

#[test]
fn test_extract_nothing_is_fatal() {
    let ws = create_test_workspace();
    std::fs::write(ws.path().join("empty.ivtff"), "# only comments\nplain text\n").unwrap();
    let output = scriptorium(ws.path(), &["extract", "-i", "empty.ivtff", "-o", "ref.txt"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("zero lines"));
    assert!(!ws.path().join("ref.txt").exists());
}

#[test]
fn test_extract_tolerates_invalid_utf8() {
    let ws = create_test_workspace();
    let mut bytes = b"<f2r.1,@P0;H>       qokeedy.".to_vec();
    bytes.extend_from_slice(&[0xff, 0xfe]);
    bytes.extend_from_slice(b"chol\n");
    std::fs::write(ws.path().join("bad.ivtff"), bytes).unwrap();
    let output = scriptorium(ws.path(), &["extract", "-i", "bad.ivtff", "-o", "ref.txt"]);
    assert!(output.status.success());
    let extracted = std::fs::read_to_string(ws.path().join("ref.txt")).unwrap();
    assert_eq!(extracted.trim(), "qokeedy. chol");
}

// ============================================================================
// generate / compare / score
// ============================================================================

#[test]
fn test_generate_json_report() {
    let ws = create_test_workspace();
    let output = scriptorium(
        ws.path(),
        &["generate", "-r", "reference.txt", "-c", "cards_valid.jsonl", "-f", "json"],
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let run = stdout_json(&output);
    assert_eq!(run["stream"], "A");
    assert_eq!(run["seed_mode"], "normal");
    assert_eq!(run["cards"], 3);
    assert_eq!(run["corpus_lines"], 16);
    assert_eq!(run["lines"].as_array().unwrap().len(), 15);
    let score = run["score"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&score));
}

#[test]
fn test_generate_is_deterministic() {
    let ws = create_test_workspace();
    let args = ["generate", "-r", "reference.txt", "-c", "cards_valid.jsonl", "-f", "json"];
    let first = scriptorium(ws.path(), &args);
    let second = scriptorium(ws.path(), &args);
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_generate_text_report() {
    let ws = create_test_workspace();
    let output = scriptorium(ws.path(), &["generate", "-r", "reference.txt"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("GENERATED"));
    assert!(stdout.contains("js_bigram"));
}

#[test]
fn test_generate_empty_corpus_is_fatal() {
    let ws = create_test_workspace();
    std::fs::write(ws.path().join("empty.txt"), "\n\n").unwrap();
    let output = scriptorium(ws.path(), &["generate", "-r", "empty.txt", "-f", "json"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("contains no lines"));
}

#[test]
fn test_generate_unparseable_cards_report_line() {
    let ws = create_test_workspace();
    let output = scriptorium(
        ws.path(),
        &["generate", "-r", "reference.txt", "-c", "cards_invalid.jsonl"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cards_invalid.jsonl"), "stderr: {}", stderr);
}

#[test]
fn test_compare_reports_delta() {
    let ws = create_test_workspace();
    let output = scriptorium(
        ws.path(),
        &["compare", "-r", "reference.txt", "-c", "cards_valid.jsonl", "-f", "json"],
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let cmp = stdout_json(&output);
    assert_eq!(cmp["normal"]["seed_mode"], "normal");
    assert_eq!(cmp["neutral"]["seed_mode"], "neutral");
    let normal = cmp["normal"]["score"].as_f64().unwrap();
    let neutral = cmp["neutral"]["score"].as_f64().unwrap();
    let delta = cmp["delta"].as_f64().unwrap();
    assert_ne!(normal, neutral, "card content should move the score");
    assert!((delta - (normal - neutral)).abs() < 1e-12);
}

#[test]
fn test_compare_without_content_has_zero_delta() {
    let ws = create_test_workspace();
    let blanked: Vec<String> = std::fs::read_to_string(ws.path().join("cards_valid.jsonl"))
        .unwrap()
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            let mut card: serde_json::Value = serde_json::from_str(l).unwrap();
            card["evidence_latin"] = serde_json::json!("");
            card["source"] = serde_json::json!({"work": "", "file": "", "locator": ""});
            card.to_string()
        })
        .collect();
    std::fs::write(ws.path().join("blank.jsonl"), blanked.join("\n")).unwrap();

    let output = scriptorium(
        ws.path(),
        &["compare", "-r", "reference.txt", "-c", "blank.jsonl", "-f", "json"],
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let cmp = stdout_json(&output);
    assert_eq!(cmp["delta"].as_f64().unwrap(), 0.0);
    assert_eq!(cmp["normal"]["lines"], cmp["neutral"]["lines"]);
}

#[test]
fn test_score_files() {
    let ws = create_test_workspace();
    let output = scriptorium(
        ws.path(),
        &["score", "-r", "reference.txt", "-g", "reference.txt", "-f", "json"],
    );
    assert!(output.status.success());
    let report = stdout_json(&output);
    assert_eq!(report["metric"], "js_bigram");
    assert!((report["score"].as_f64().unwrap() - 1.0).abs() < 1e-9);
    assert!((report["scores"]["cosine_trigram"].as_f64().unwrap() - 1.0).abs() < 1e-9);
}

#[test]
fn test_score_empty_reference_is_fatal() {
    let ws = create_test_workspace();
    std::fs::write(ws.path().join("empty.txt"), "").unwrap();
    let output = scriptorium(
        ws.path(),
        &["score", "-r", "empty.txt", "-g", "reference.txt", "-f", "json"],
    );
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("contains no lines"));
}

#[test]
fn test_score_reference_respects_max_lines() {
    let ws = create_test_workspace();
    std::fs::write(ws.path().join("capped.toml"), "[corpus]\nmax_lines = 1\n").unwrap();
    let first_line = std::fs::read_to_string(ws.path().join("reference.txt"))
        .unwrap()
        .lines()
        .find(|l| !l.trim().is_empty())
        .unwrap()
        .to_string();
    std::fs::write(ws.path().join("first.txt"), &first_line).unwrap();

    let output = scriptorium(
        ws.path(),
        &["--config", "capped.toml", "score", "-r", "reference.txt", "-g", "first.txt", "-f", "json"],
    );
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let report = stdout_json(&output);
    assert!((report["score"].as_f64().unwrap() - 1.0).abs() < 1e-9);
}

#[test]
fn test_score_unknown_metric_fails() {
    let ws = create_test_workspace();
    let output = scriptorium(
        ws.path(),
        &["score", "-r", "reference.txt", "-g", "reference.txt", "-m", "kl"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown similarity metric"));
}
