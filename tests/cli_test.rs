//! Process-level tests for the `findingnorm` binary over stdin/stdout.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use serde_json::Value;

fn findingnorm_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_findingnorm"));
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("FINDINGNORM_LOG_FORMAT");
    cmd.env_remove("FINDINGNORM_HTTP_TIMEOUT_SECS");
    cmd.env_remove("FINDINGNORM_DEFAULT_SCANNER");
    cmd.env_remove("FINDINGNORM_USER_AGENT");
    cmd
}

fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    run_with_stdin_bytes(args, stdin.as_bytes())
}

fn run_with_stdin_bytes(args: &[&str], stdin: &[u8]) -> Output {
    let mut child = findingnorm_cmd()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn findingnorm");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin)
        .expect("write stdin");
    child.wait_with_output().expect("wait findingnorm")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn certificate_finding_printed_compactly() {
    let out = run_with_stdin(
        &[],
        r#"{"certificate_analysis": {"certificate_findings": [["warning", "Weak signature algorithm", "Signature Algorithm"]]}}"#,
    );
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    assert_eq!(
        stdout(&out),
        "[{\"name\":\"Signature Algorithm\",\"description\":\"Weak signature algorithm\",\"category\":\"Certificate Analysis\",\"location\":\"\",\"osi_layer\":\"APPLICATION\",\"severity\":\"MEDIUM\",\"attributes\":{\"source\":\"certificate_analysis\"}}]\n"
    );
}

#[test]
fn manifest_finding_with_component() {
    let out = run_with_stdin(
        &[],
        r#"{"manifest_analysis": {"manifest_findings": [{"severity":"high","title":"Exported Activity","description":"Activity is exported","rule":"Manifest","component":["com.app.MainActivity"]}]}}"#,
    );
    assert_eq!(out.status.code(), Some(0));

    let findings: Value = serde_json::from_str(&stdout(&out)).unwrap();
    let findings = findings.as_array().unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0]["name"], "Exported Activity");
    assert_eq!(findings[0]["category"], "Manifest");
    assert_eq!(findings[0]["location"], "com.app.MainActivity");
    assert_eq!(findings[0]["severity"], "HIGH");
    assert_eq!(findings[0]["attributes"]["source"], "manifest_analysis");
    assert_eq!(findings[0].as_object().unwrap().len(), 7);
}

#[test]
fn empty_stdin_exits_zero_with_diagnostic() {
    let out = run_with_stdin(&[], "   \n");
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty());
    assert!(stderr(&out).contains("No input received."));
}

#[test]
fn malformed_json_exits_one() {
    let out = run_with_stdin(&[], "{\"certificate_analysis\": [");
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    assert!(stderr(&out).contains("Invalid input: invalid JSON"));
}

#[test]
fn combined_report_lists_certificate_first() {
    let out = run_with_stdin(
        &[],
        r#"{"manifest_analysis": {"manifest_findings": [{"name": "Backup Allowed"}]},
            "certificate_analysis": {"certificate_findings": [["high", "SHA1 signature", "Hash collision"]]}}"#,
    );
    assert_eq!(out.status.code(), Some(0));

    let findings: Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(findings.as_array().unwrap().len(), 2);
    assert_eq!(findings[0]["name"], "Hash collision");
    assert_eq!(findings[0]["category"], "Certificate Analysis");
    assert_eq!(findings[1]["name"], "Backup Allowed");
    assert_eq!(findings[1]["category"], "Manifest Analysis");
}

#[test]
fn empty_report_object_prints_empty_array() {
    let out = run_with_stdin(&[], "{}");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "[]\n");
}

#[test]
fn malformed_certificate_tuple_exits_one() {
    let out = run_with_stdin(
        &[],
        r#"{"certificate_analysis": {"certificate_findings": [["warning", "only two"]]}}"#,
    );
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    assert!(stderr(&out).contains("certificate_findings[0]"));
}

#[test]
fn non_url_first_argument_reads_stdin() {
    let out = run_with_stdin(&["raw.json"], "{}");
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "[]\n");
}

#[test]
fn tlsx_scanner_from_stdin() {
    let out = run_with_stdin(
        &["--scanner", "tlsx"],
        include_str!("fixtures/tlsx_output.jsonl"),
    );
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));

    let findings: Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(findings.as_array().unwrap().len(), 3);
    assert_eq!(findings[0]["category"], "TLS Certificate Info");
    assert_eq!(findings[0]["severity"], "LOW");
}

#[test]
fn default_scanner_from_environment() {
    let mut child = findingnorm_cmd()
        .env("FINDINGNORM_DEFAULT_SCANNER", "naabu")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn findingnorm");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(include_bytes!("fixtures/naabu_output.jsonl"))
        .expect("write stdin");
    let out = child.wait_with_output().expect("wait findingnorm");

    assert_eq!(out.status.code(), Some(0));
    let findings: Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(findings[0]["category"], "Open Port");
}

#[test]
fn file_input_and_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("mobsf.json");
    let output = dir.path().join("findings.json");
    std::fs::write(&input, include_str!("fixtures/mobsf_report.json")).unwrap();

    let out = findingnorm_cmd()
        .arg("--input-file")
        .arg(&input)
        .arg("--output-file")
        .arg(&output)
        .stdin(Stdio::null())
        .output()
        .expect("run findingnorm");

    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    assert!(out.stdout.is_empty());
    let findings: Value = serde_json::from_str(&std::fs::read_to_string(output).unwrap()).unwrap();
    assert_eq!(findings.as_array().unwrap().len(), 6);
}

#[test]
fn json_log_format_keeps_stdout_clean() {
    let mut child = findingnorm_cmd()
        .env("FINDINGNORM_LOG_FORMAT", "json")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn findingnorm");
    drop(child.stdin.take());
    let out = child.wait_with_output().expect("wait findingnorm");

    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty());
    let line = stderr(&out);
    let event: Value = serde_json::from_str(line.lines().next().unwrap()).unwrap();
    assert_eq!(event["level"], "WARN");
}

#[test]
fn invalid_configuration_exits_one() {
    let out = findingnorm_cmd()
        .env("FINDINGNORM_HTTP_TIMEOUT_SECS", "never")
        .stdin(Stdio::null())
        .output()
        .expect("run findingnorm");
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("FINDINGNORM_HTTP_TIMEOUT_SECS"));
}

#[test]
fn unknown_scanner_is_usage_error() {
    let out = findingnorm_cmd()
        .args(["--scanner", "zap"])
        .stdin(Stdio::null())
        .output()
        .expect("run findingnorm");
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn non_utf8_stdin_is_invalid_input() {
    let out = run_with_stdin_bytes(&[], b"{\"certificate_analysis\": \"\xff\xfe\"}");
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    let err = stderr(&out);
    assert!(err.contains("Invalid input"), "stderr: {err}");
    assert!(!err.contains("Failed to fetch"), "stderr: {err}");
}

#[test]
fn naabu_scan_without_open_ports_prints_empty_array() {
    let out = run_with_stdin(
        &["--scanner", "naabu"],
        "[INF] Running CONNECT scan\n{\"ip\": truncated\n",
    );
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "[]\n");
}
