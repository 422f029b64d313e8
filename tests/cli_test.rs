//! Integration tests for CLI argument parsing.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("hwcap"));
    cmd.arg("--help");
    cmd.assert().success().stdout(predicate::str::contains(
        "capability detection and tool installation",
    ));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("hwcap"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_lists_subcommands_in_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("hwcap"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("detect"))
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("remove"))
        .stdout(predicate::str::contains("completions"));
    Ok(())
}

#[test]
fn cli_rejects_unknown_capability() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("hwcap"));
    cmd.args(["check", "--capability", "flux-capacitor"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("flux-capacitor"));
    Ok(())
}

#[test]
fn cli_rejects_malformed_snap_channel() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("hwcap"));
    cmd.args([
        "--dcgm-channel",
        "not-a-channel",
        "check",
        "--capability",
        "dcgm",
    ]);
    cmd.assert().failure();
    Ok(())
}

#[test]
fn cli_generates_bash_completions() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("hwcap"));
    cmd.args(["completions", "bash"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("hwcap"));
    Ok(())
}
