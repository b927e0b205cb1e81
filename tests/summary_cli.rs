use std::fs;
use std::process::Command;

const MERGED: &str = "\
TN:
SF:/src/proxy/http2/HPACK.cc
FNF:4
FNH:2
BRF:10
BRH:5
LF:40
LH:30
end_of_record
";

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_corpus-coverage"))
}

#[test]
fn summary_prints_line_rate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corpus.info");
    fs::write(&path, MERGED).unwrap();

    let output = binary().arg("summary").arg(&path).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("(1 source files)"), "{}", stdout);
    assert!(stdout.contains("75.0% (30 of 40)"), "{}", stdout);
}

#[test]
fn summary_json_is_machine_readable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corpus.info");
    fs::write(&path, MERGED).unwrap();

    let output = binary()
        .args(["summary", "--json"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["lines_found"], 40);
    assert_eq!(value["branches_hit"], 5);
}

#[test]
fn missing_tracefile_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();

    let output = binary()
        .arg("summary")
        .arg(dir.path().join("absent.info"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.starts_with("Error: Failed to open tracefile"), "{}", stderr);
}

#[test]
fn gather_rejects_missing_corpus_dir() {
    let dir = tempfile::tempdir().unwrap();

    let output = binary()
        .args(["gather", "--corpusdir"])
        .arg(dir.path().join("nope"))
        .args(["--program", "/bin/true"])
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("does not exist"), "{}", stderr);
}
