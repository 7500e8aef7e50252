use std::{
    ffi::OsStr,
    fs,
    path::Path,
    process::{Command, Output},
};

use tempfile::TempDir;

static BIN: &str = env!("CARGO_BIN_EXE_ipcheck");

fn workspace(desired: &str, total: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("desired_ips.csv"), desired).unwrap();
    fs::write(dir.path().join("total_ips.csv"), total).unwrap();
    dir
}

fn command_output(dir: &Path, args: impl IntoIterator<Item = impl AsRef<OsStr>>) -> Output {
    Command::new(BIN)
        .current_dir(dir)
        .env("RUST_LOG", "off")
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> &str {
    std::str::from_utf8(&output.stdout).unwrap()
}

#[test]
fn default_files_match() {
    let dir = workspace(
        "192.168.1.1\n10.0.0.0-10.0.0.255\n",
        "192.168.1.0/24\n10.0.0.0/16\n",
    );

    let output = command_output(dir.path(), None::<&str>);

    assert_eq!(stdout(&output), "match\n");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn no_match_reports_counterexample() {
    let dir = workspace("192.168.2.1\n", "192.168.1.0/24\n");

    for algorithm in ["merge", "direct"] {
        let output = command_output(dir.path(), ["--algorithm", algorithm]);

        assert_eq!(
            stdout(&output),
            "no match\nfirst uncovered address: 192.168.2.1 (3232236033)\n"
        );
        assert_eq!(output.status.code(), Some(1));
    }
}

#[test]
fn explicit_paths() {
    let dir = workspace("", "");
    fs::write(dir.path().join("a.txt"), "10.0.0.5\n").unwrap();
    fs::write(dir.path().join("b.txt"), "10.0.0.0/24\n").unwrap();

    let output = command_output(dir.path(), ["a.txt", "b.txt"]);

    assert_eq!(stdout(&output), "match\n");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn malformed_entry_fails() {
    let dir = workspace("10.0.0.1\n", "10.0.0.5/24\n");

    let output = command_output(dir.path(), None::<&str>);
    let stderr = std::str::from_utf8(&output.stderr).unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("total_ips.csv"), "{stderr}");
    assert!(stderr.contains("host bits are set"), "{stderr}");

    let output = command_output(dir.path(), ["--normalize-cidr"]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();

    let output = command_output(dir.path(), None::<&str>);
    let stderr = std::str::from_utf8(&output.stderr).unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("failed to read desired_ips.csv"), "{stderr}");
}

#[test]
fn malformed_entry_reports_file_line() {
    let dir = workspace("# header\n\n10.0.0.1\n\nbogus\n", "10.0.0.0/8\n");

    let output = command_output(dir.path(), None::<&str>);
    let stderr = std::str::from_utf8(&output.stderr).unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("line 5: "), "{stderr}");
    // the progress bar is not drawn when stderr is not a terminal
    assert_eq!(stderr.lines().count(), 1, "{stderr}");
}
