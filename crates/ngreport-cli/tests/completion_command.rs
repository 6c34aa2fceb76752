use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_ngreport_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("ngreport")
}

#[test]
fn test_completion_command_help() {
    let mut cmd = Command::new(get_ngreport_bin());
    cmd.arg("completion").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Generate shell completion scripts",
        ))
        .stdout(predicate::str::contains("SUPPORTED SHELLS"))
        .stdout(predicate::str::contains("bash"))
        .stdout(predicate::str::contains("zsh"))
        .stdout(predicate::str::contains("fish"))
        .stdout(predicate::str::contains("INSTALLATION"))
        .stdout(predicate::str::contains("~/.bashrc"))
        .stdout(predicate::str::contains("~/.zshrc"));
}

#[test]
fn test_completion_bash_generates_script() {
    let mut cmd = Command::new(get_ngreport_bin());
    cmd.arg("completion").arg("--shell").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("_ngreport()"))
        .stdout(predicate::str::contains("complete -F _ngreport"));
}

#[test]
fn test_completion_zsh_generates_script() {
    let mut cmd = Command::new(get_ngreport_bin());
    cmd.arg("completion").arg("--shell").arg("zsh");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("#compdef ngreport"))
        .stdout(predicate::str::contains("_ngreport()"));
}

#[test]
fn test_completion_fish_mentions_analyze() {
    let mut cmd = Command::new(get_ngreport_bin());
    cmd.arg("completion").arg("--shell").arg("fish");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("complete -c ngreport"))
        .stdout(predicate::str::contains("analyze"));
}

#[test]
fn test_completion_invalid_shell() {
    let mut cmd = Command::new(get_ngreport_bin());
    cmd.arg("completion").arg("--shell").arg("tcsh");

    cmd.assert().failure();
}
