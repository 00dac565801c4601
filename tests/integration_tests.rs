//! Integration tests for the lintpool CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn git(dir: &Path, args: &[&str]) {
    let status = std::process::Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git must be available for integration tests");
    assert!(status.status.success(), "git {args:?} failed");
}

fn init_repo(dir: &Path) {
    git(dir, &["init", "-q"]);
}

fn commit_all(dir: &Path, message: &str) {
    git(dir, &["add", "."]);
    git(
        dir,
        &[
            "-c",
            "user.name=lintpool",
            "-c",
            "user.email=lintpool@example.com",
            "commit",
            "-q",
            "-m",
            message,
        ],
    );
}

#[cfg(unix)]
fn write_stub(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Test CLI binary exists and responds to --help
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("lintpool").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("clang-format"));
}

/// Test CLI responds to --version
#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("lintpool").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lintpool"));
}

/// Test invalid subcommand shows error
#[test]
fn test_invalid_subcommand() {
    let mut cmd = Command::cargo_bin("lintpool").unwrap();
    cmd.arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

/// `check` without --format/--tidy prints help and exits cleanly
#[test]
fn test_check_without_mode_flags() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("lintpool").unwrap();
    cmd.current_dir(temp_dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

/// `files --all` lists pattern matches from the repository, untracked
/// included, and skips everything else
#[test]
fn test_files_lists_candidates() {
    let temp_dir = TempDir::new().unwrap();
    init_repo(temp_dir.path());
    fs::write(temp_dir.path().join("a.cpp"), "int main() { return 0; }\n").unwrap();
    fs::write(temp_dir.path().join("notes.txt"), "not a source file\n").unwrap();

    let mut cmd = Command::cargo_bin("lintpool").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["files", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a.cpp"))
        .stdout(predicate::str::contains("notes.txt").not());
}

/// Clean formatter run over all candidates exits 0
#[cfg(unix)]
#[test]
fn test_check_format_clean() {
    let temp_dir = TempDir::new().unwrap();
    init_repo(temp_dir.path());
    fs::write(temp_dir.path().join("a.cpp"), "int main() { return 0; }\n").unwrap();
    let stub = write_stub(temp_dir.path(), "fake-clang-format", "#!/bin/sh\nexit 0\n");

    let mut cmd = Command::cargo_bin("lintpool").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["check", "--format", "-a", "--clang-format-binary"])
        .arg(&stub)
        .assert()
        .success()
        .stdout(predicate::str::contains("No files need to be formatted"));
}

/// A replacement marker in formatter output flags the file and exits 1
#[cfg(unix)]
#[test]
fn test_check_format_flags_files() {
    let temp_dir = TempDir::new().unwrap();
    init_repo(temp_dir.path());
    fs::write(temp_dir.path().join("a.cpp"), "int main(){return 0;}\n").unwrap();
    let stub = write_stub(
        temp_dir.path(),
        "fake-clang-format",
        concat!(
            "#!/bin/sh\n",
            "if [ \"$1\" = \"--version\" ]; then echo \"stub version 99.0.0\"; exit 0; fi\n",
            "echo \"<replacements><replacement offset='0' length='1'> </replacement></replacements>\"\n",
            "exit 0\n",
        ),
    );

    let mut cmd = Command::cargo_bin("lintpool").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["check", "--format", "-a", "--clang-format-binary"])
        .arg(&stub)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Files that need formatting:"))
        .stdout(predicate::str::contains("a.cpp"));
}

/// A formatter that exits non-zero is a hard failure: exit 2
#[cfg(unix)]
#[test]
fn test_check_format_tool_failure() {
    let temp_dir = TempDir::new().unwrap();
    init_repo(temp_dir.path());
    fs::write(temp_dir.path().join("a.cpp"), "int main() { return 0; }\n").unwrap();
    let stub = write_stub(
        temp_dir.path(),
        "fake-clang-format",
        concat!(
            "#!/bin/sh\n",
            "if [ \"$1\" = \"--version\" ]; then exit 0; fi\n",
            "exit 7\n",
        ),
    );

    let mut cmd = Command::cargo_bin("lintpool").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["check", "--format", "-a", "--clang-format-binary"])
        .arg(&stub)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed executing commands:"));
}

/// --quiet suppresses the listing but keeps the exit code
#[cfg(unix)]
#[test]
fn test_check_format_quiet_keeps_exit_code() {
    let temp_dir = TempDir::new().unwrap();
    init_repo(temp_dir.path());
    fs::write(temp_dir.path().join("a.cpp"), "int main(){return 0;}\n").unwrap();
    let stub = write_stub(
        temp_dir.path(),
        "fake-clang-format",
        concat!(
            "#!/bin/sh\n",
            "if [ \"$1\" = \"--version\" ]; then exit 0; fi\n",
            "echo \"<replacement \"\n",
            "exit 0\n",
        ),
    );

    let mut cmd = Command::cargo_bin("lintpool").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["--quiet", "check", "--format", "-a", "--clang-format-binary"])
        .arg(&stub)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Files that need formatting").not());
}

/// `version` renders the header for the latest tag
#[test]
fn test_version_renders_header() {
    let temp_dir = TempDir::new().unwrap();
    init_repo(temp_dir.path());
    fs::write(temp_dir.path().join("a.cpp"), "int main() { return 0; }\n").unwrap();
    commit_all(temp_dir.path(), "initial");
    git(temp_dir.path(), &["tag", "v1.2.3"]);

    let mut cmd = Command::cargo_bin("lintpool").unwrap();
    cmd.current_dir(temp_dir.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("VERSION_STRING      = \"v1.2.3\""))
        .stdout(predicate::str::contains("VERSION_MAJOR      = 1"));
}

/// `version --output` writes once, then reports the file unchanged
#[test]
fn test_version_output_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    init_repo(temp_dir.path());
    fs::write(temp_dir.path().join("a.cpp"), "int main() { return 0; }\n").unwrap();
    commit_all(temp_dir.path(), "initial");
    git(temp_dir.path(), &["tag", "v0.1.0"]);

    let header = temp_dir.path().join("version.h");

    let mut cmd = Command::cargo_bin("lintpool").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["version", "--output"])
        .arg(&header)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote version header"));
    assert!(
        fs::read_to_string(&header)
            .unwrap()
            .contains("VERSION_STRING      = \"v0.1.0\"")
    );

    let mut cmd = Command::cargo_bin("lintpool").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["version", "--output"])
        .arg(&header)
        .assert()
        .success()
        .stdout(predicate::str::contains("unchanged"));
}

/// `version` without a reachable tag fails with the hard-failure code
#[test]
fn test_version_without_tags_fails() {
    let temp_dir = TempDir::new().unwrap();
    init_repo(temp_dir.path());
    fs::write(temp_dir.path().join("a.cpp"), "int main() { return 0; }\n").unwrap();
    commit_all(temp_dir.path(), "initial");

    let mut cmd = Command::cargo_bin("lintpool").unwrap();
    cmd.current_dir(temp_dir.path())
        .arg("version")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No version tag"));
}
