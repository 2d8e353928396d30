//! Integration tests for scangate-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![cfg(unix)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

fn scangate_cmd() -> Command {
    cargo_bin_cmd!("scangate")
}

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("failed to write script");
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// Fake archiver honoring the invocation contract: extraction copies the
/// archive into the output directory, compression concatenates file entries
/// into the output path.
fn fake_archiver(dir: &Path, fail_extract: bool) -> PathBuf {
    let extract_body = if fail_extract {
        "  exit 7"
    } else {
        "  cp \"$1\" \"$3/payload.txt\""
    };
    let body = format!(
        r#"mode="$1"
shift
case "$mode" in
extract)
{extract_body}
  ;;
compress)
  out=""
  prev=""
  for a in "$@"; do
    if [ "$prev" = "--output" ]; then out="$a"; fi
    prev="$a"
  done
  : > "$out"
  for a in "$@"; do
    case "$a" in
      --*|max) ;;
      *) if [ -f "$a" ]; then cat "$a" >> "$out"; fi ;;
    esac
  done
  ;;
*)
  exit 9
  ;;
esac
exit 0"#
    );
    write_script(dir, "archive-tool", &body)
}

struct Fixture {
    temp: TempDir,
    archiver: PathBuf,
    scanner: PathBuf,
    source: PathBuf,
    workspace: PathBuf,
    output: PathBuf,
}

fn fixture(fail_extract: bool, scanner_body: &str) -> Fixture {
    let temp = TempDir::new().expect("failed to create temp dir");
    let archiver = fake_archiver(temp.path(), fail_extract);
    let scanner = write_script(temp.path(), "scanner", scanner_body);

    let source = temp.path().join("input.7z");
    fs::write(&source, b"archive contents").unwrap();

    let workspace = temp.path().join("ws");
    let output = temp.path().join("temp_result.7z");

    Fixture {
        temp,
        archiver,
        scanner,
        source,
        workspace,
        output,
    }
}

fn run(fx: &Fixture) -> Command {
    let mut cmd = scangate_cmd();
    cmd.arg(&fx.source)
        .arg("--workspace-dir")
        .arg(&fx.workspace)
        .arg("--output")
        .arg(&fx.output)
        .arg("--archiver")
        .arg(&fx.archiver)
        .arg("--scanner")
        .arg(&fx.scanner);
    cmd
}

#[test]
fn test_version_flag() {
    scangate_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("scangate"));
}

#[test]
fn test_help_flag() {
    scangate_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan its contents").or(
            predicate::str::contains("repack it on success"),
        ));
}

#[test]
fn test_successful_run_exits_zero() {
    let fx = fixture(false, "exit 0");

    run(&fx)
        .assert()
        .success()
        .stdout(predicate::str::contains("Scan passed"));

    assert!(fx.output.is_file());
    assert!(fx.output.metadata().unwrap().len() > 0);
    assert!(!fx.workspace.exists(), "workspace must be gone");
}

#[test]
fn test_scan_failure_exits_two() {
    let fx = fixture(false, "exit 1");

    run(&fx)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("scan stage failed"));

    assert!(!fx.output.exists(), "no output on scan failure");
    assert!(!fx.workspace.exists(), "workspace must be gone");
}

#[test]
fn test_extraction_failure_exits_one() {
    let fx = fixture(true, "exit 0");

    run(&fx)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("extract stage failed"));

    assert!(!fx.output.exists());
    assert!(!fx.workspace.exists(), "workspace must be gone");
}

#[test]
fn test_missing_scanner_reports_launch_problem() {
    let mut fx = fixture(false, "exit 0");
    fx.scanner = fx.temp.path().join("no-such-scanner");

    run(&fx)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Cannot run"));
}

#[test]
fn test_source_resolution_requires_exactly_one_match() {
    let fx = fixture(false, "exit 0");
    fs::write(fx.temp.path().join("another.7z"), b"second archive").unwrap();

    // No positional archive: resolve from the working directory, which now
    // holds input.7z and another.7z.
    scangate_cmd()
        .current_dir(fx.temp.path())
        .arg("--workspace-dir")
        .arg(&fx.workspace)
        .arg("--output")
        .arg(&fx.output)
        .arg("--archiver")
        .arg(&fx.archiver)
        .arg("--scanner")
        .arg(&fx.scanner)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("exactly one"));
}

#[test]
fn test_source_resolution_with_no_match_fails() {
    let temp = TempDir::new().expect("failed to create temp dir");

    scangate_cmd()
        .current_dir(temp.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no .7z archive"));
}

#[test]
fn test_source_resolution_with_single_match_succeeds() {
    let fx = fixture(false, "exit 0");

    scangate_cmd()
        .current_dir(fx.temp.path())
        .arg("--workspace-dir")
        .arg(&fx.workspace)
        .arg("--output")
        .arg(&fx.output)
        .arg("--archiver")
        .arg(&fx.archiver)
        .arg("--scanner")
        .arg(&fx.scanner)
        .assert()
        .success();

    assert!(fx.output.is_file());
}

#[test]
fn test_stale_workspace_refused_without_force() {
    let fx = fixture(false, "exit 0");
    fs::create_dir(&fx.workspace).unwrap();
    fs::write(fx.workspace.join("stale.txt"), b"leftover").unwrap();

    run(&fx)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_stale_workspace_cleared_with_force() {
    let fx = fixture(false, "exit 0");
    fs::create_dir(&fx.workspace).unwrap();
    fs::write(fx.workspace.join("stale.txt"), b"leftover").unwrap();

    run(&fx).arg("--force").assert().success();

    assert!(fx.output.is_file());
    assert!(!fx.workspace.exists());
}

#[test]
fn test_json_success_output() {
    let fx = fixture(false, "exit 0");

    let output = run(&fx)
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("invalid JSON output");
    assert_eq!(json["status"], "success");
    assert_eq!(json["operation"], "run");
    assert!(json["data"]["output_bytes"].as_u64().unwrap() > 0);
    assert_eq!(json["data"]["files_scanned"], 1);
}

#[test]
fn test_json_failure_output_carries_stage() {
    let fx = fixture(false, "exit 1");

    let output = run(&fx)
        .arg("--json")
        .assert()
        .failure()
        .code(2)
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).expect("invalid JSON output");
    assert_eq!(json["status"], "error");
    assert_eq!(json["stage"], "scan");
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .contains("exit code 1")
    );
}

#[test]
fn test_quiet_suppresses_success_output() {
    let fx = fixture(false, "exit 0");

    run(&fx)
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_timeout_kills_slow_scanner() {
    let fx = fixture(false, "sleep 30");

    run(&fx)
        .arg("--timeout")
        .arg("1")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("deadline"));

    assert!(!fx.workspace.exists(), "workspace must be gone");
}
