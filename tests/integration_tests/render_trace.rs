//! Integration tests for the swimlane binary.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

const SAMPLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/src/trace/testdata/sample.ndjson");

/// A command whose config lookup can't see the developer's own config file.
fn swimlane(config_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_swimlane"));
    cmd.env("SWIMLANE_CONFIG_PATH", config_dir.join("config.toml"))
        .env_remove("RUST_LOG");
    cmd
}

fn run_with_stdin(mut cmd: Command, input: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn swimlane");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .expect("Failed to write to stdin");

    child.wait_with_output().expect("Failed to read output")
}

#[test]
fn test_render_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = swimlane(dir.path())
        .args([SAMPLE, "--width", "20"])
        .output()
        .expect("Failed to run swimlane");

    assert!(output.status.success(), "swimlane should succeed");
    insta::assert_snapshot!(String::from_utf8_lossy(&output.stdout), @r"
    ============================================================
                          SWIMLANE LAYOUT
    ============================================================
    spans: 5  rows: 5  duration: 20

    TIMELINE
    --------
       0 |--------------------|
       1 |--------------------|
       2 |  -##-  ------      |
       3 |         ---        |
       4 |                --  |

    ROWS
    ----
    Row 0
      <root> (0 to 20)
    Row 1
      request (0 to 20)
    Row 2
      parse (2 to 6)
      query (8 to 14)
    Row 3
      fetch (9 to 12)
    Row 4
      flush (16 to 18)
    ");
}

#[test]
fn test_render_from_stdin_with_summary() {
    let dir = tempfile::tempdir().unwrap();
    let input = std::fs::read_to_string(SAMPLE).unwrap();
    let mut cmd = swimlane(dir.path());
    cmd.args(["-", "--no-timeline", "--summary"]);
    let output = run_with_stdin(cmd, &input);

    assert!(output.status.success(), "swimlane should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("TIMELINE"), "Timeline should be skipped");
    assert!(stdout.contains("NAME BREAKDOWN"), "Should show breakdown");
    assert!(
        stdout.contains("spans: 5  depth: 3  rows: 5  duration: 20"),
        "{stdout}"
    );

    // Sorted by total time: request (20) before query (6)
    let request = stdout.find("\nrequest ").unwrap();
    let query = stdout.find("\nquery ").unwrap();
    assert!(request < query);
}

#[test]
fn test_config_file_sets_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[render]\ntimeline = false\nsummary = true\n",
    )
    .unwrap();

    let output = swimlane(dir.path())
        .arg(SAMPLE)
        .output()
        .expect("Failed to run swimlane");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("TIMELINE"));
    assert!(stdout.contains("NAME BREAKDOWN"));
}

#[test]
fn test_missing_explicit_config() {
    let dir = tempfile::tempdir().unwrap();
    let output = swimlane(dir.path())
        .arg(SAMPLE)
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .output()
        .expect("Failed to run swimlane");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Config file not found"), "{stderr}");
}

#[test]
fn test_nonexistent_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = swimlane(dir.path())
        .arg("/nonexistent/path/to/trace.ndjson")
        .output()
        .expect("Failed to run swimlane");

    assert!(!output.status.success(), "Should fail with non-existent file");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read"), "{stderr}");
}

#[test]
fn test_empty_input() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_with_stdin(swimlane(dir.path()), "\n# nothing here\n");

    assert!(!output.status.success(), "Should fail with no events");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No events found in input"), "{stderr}");
}

#[test]
fn test_malformed_line_reports_line_number() {
    let dir = tempfile::tempdir().unwrap();
    let input = r#"{"type":"SpanStart","id":1,"ts":0,"name":"a"}
{"type":"SpanEnd","id":1"#;
    let output = run_with_stdin(swimlane(dir.path()), input);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to parse trace: line 2:"), "{stderr}");
}

#[test]
fn test_invalid_stream_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = r#"{"type":"SpanStart","id":1,"ts":0,"name":"a"}
{"type":"SpanStart","id":1,"ts":1,"name":"b"}"#;
    let output = run_with_stdin(swimlane(dir.path()), input);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid event stream: duplicate span ID 1"),
        "{stderr}"
    );
}

#[test]
fn test_width_below_minimum_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let output = swimlane(dir.path())
        .args([SAMPLE, "--width", "2"])
        .output()
        .expect("Failed to run swimlane");

    assert!(!output.status.success());
}

#[test]
fn test_unfinished_spans_are_closed() {
    let dir = tempfile::tempdir().unwrap();
    let input = r#"{"type":"SpanStart","id":1,"ts":0,"name":"a"}
{"type":"SpanStart","id":2,"parent":1,"ts":4,"name":"b"}"#;
    let output = run_with_stdin(swimlane(dir.path()), input);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("  a (0 to 4)"), "{stdout}");
    assert!(stdout.contains("  b (4 to 4)"), "{stdout}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unfinished span"), "{stderr}");
}
