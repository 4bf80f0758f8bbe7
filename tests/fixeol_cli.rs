// CLI integration tests for `fixeol` check and convert flows.
use std::fs;
use std::process::Command;

use serde_json::Value;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_fixeol");
    Command::new(exe)
}

fn stdout_lines(output: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(output)
        .lines()
        .map(str::to_string)
        .collect()
}

fn stderr_error(output: &[u8]) -> Value {
    let text = String::from_utf8_lossy(output);
    let line = text
        .lines()
        .find(|line| line.starts_with('{'))
        .expect("json error line");
    serde_json::from_str(line).expect("valid json")
}

#[test]
fn check_then_convert_then_settle() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();
    fs::write(root.join("dos.txt"), b"a\r\nb\r\n").expect("write");
    fs::write(root.join("unix.txt"), b"a\nb\n").expect("write");
    fs::write(root.join("blob.bin"), b"\x00\r\n").expect("write");
    let dir = root.to_str().unwrap();

    let check = cmd().args(["--eol", "unix", dir]).output().expect("check");
    assert!(check.status.success());
    let lines = stdout_lines(&check.stdout);
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("[ ] ") && lines[0].ends_with("blob.bin"));
    assert!(lines[1].starts_with("[X] ") && lines[1].ends_with("dos.txt"));
    assert!(lines[2].starts_with("[ ] ") && lines[2].ends_with("unix.txt"));
    assert_eq!(
        lines[3],
        "3 files checked: 2 untouched, 1 detected, 0 converted, 0 failed"
    );
    assert_eq!(fs::read(root.join("dos.txt")).unwrap(), b"a\r\nb\r\n");

    let convert = cmd()
        .args(["-e", "LF", "--auto-convert", dir])
        .output()
        .expect("convert");
    assert!(convert.status.success());
    let lines = stdout_lines(&convert.stdout);
    assert!(lines[1].starts_with("[C] "));
    assert_eq!(fs::read(root.join("dos.txt")).unwrap(), b"a\nb\n");
    assert_eq!(fs::read(root.join("blob.bin")).unwrap(), b"\x00\r\n");

    let again = cmd()
        .args(["-e", "unix", "--auto-convert", dir])
        .output()
        .expect("again");
    assert!(again.status.success());
    assert!(
        stdout_lines(&again.stdout)
            .iter()
            .take(3)
            .all(|line| line.starts_with("[ ] "))
    );
}

#[test]
fn single_file_target_in_jsonl() {
    let temp = tempfile::tempdir().expect("tempdir");
    let file = temp.path().join("mac.txt");
    fs::write(&file, b"a\rb\r").expect("write");

    let output = cmd()
        .args([
            "--eol",
            "win",
            "--auto-convert",
            "--format",
            "jsonl",
            file.to_str().unwrap(),
        ])
        .output()
        .expect("run");
    assert!(output.status.success());
    let lines = stdout_lines(&output.stdout);
    assert_eq!(lines.len(), 2);
    let entry: Value = serde_json::from_str(&lines[0]).expect("entry json");
    assert_eq!(entry["status"], "converted");
    let summary: Value = serde_json::from_str(&lines[1]).expect("summary json");
    assert_eq!(summary["summary"]["converted"], 1);
    assert_eq!(fs::read(&file).unwrap(), b"a\r\nb\r\n");
}

#[test]
fn unknown_eol_is_usage_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = cmd()
        .args(["--eol", "dos", temp.path().to_str().unwrap()])
        .output()
        .expect("run");
    assert_eq!(output.status.code().unwrap(), 2);
    let err = stderr_error(&output.stderr);
    assert_eq!(err["error"]["kind"], "Usage");
}

#[test]
fn missing_eol_and_extra_paths_are_usage_errors() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path().to_str().unwrap();

    let no_eol = cmd().arg(dir).output().expect("run");
    assert_eq!(no_eol.status.code().unwrap(), 2);

    let no_path = cmd().args(["--eol", "lf"]).output().expect("run");
    assert_eq!(no_path.status.code().unwrap(), 2);

    let too_many = cmd().args(["--eol", "lf", dir, dir]).output().expect("run");
    assert_eq!(too_many.status.code().unwrap(), 2);
    let err = stderr_error(&too_many.stderr);
    assert_eq!(
        err["error"]["message"],
        "too many input file or directory arguments"
    );
}

#[test]
fn missing_target_exits_not_found() {
    let temp = tempfile::tempdir().expect("tempdir");
    let missing = temp.path().join("nope");
    let output = cmd()
        .args(["--eol", "lf", missing.to_str().unwrap()])
        .output()
        .expect("run");
    assert_eq!(output.status.code().unwrap(), 3);
    assert!(output.stdout.is_empty());
}

#[test]
fn bare_invocation_prints_help() {
    let output = cmd().output().expect("run");
    assert_eq!(output.status.code().unwrap(), 2);
}
