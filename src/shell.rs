//! Subprocess execution.
//!
//! Everything the engine learns about the machine and everything it changes
//! goes through OS commands (lshw, hwinfo, ipmitool, dpkg, apt-get, snap).
//! [`CommandRunner`] is the single seam: production code uses
//! [`SystemRunner`], tests script outcomes without touching the system.
//!
//! A command that starts but exits non-zero is a normal
//! [`CommandOutput`] with `success == false`; only failure to spawn is an
//! error. Callers that require success use [`check_output`].

use std::process::Command;

use crate::error::{HwcapError, Result};

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Whether the command succeeded (exit code 0).
    pub success: bool,
}

impl CommandOutput {
    /// A successful run with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        CommandOutput {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
            success: true,
        }
    }

    /// A failed run with the given exit code and stderr.
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        CommandOutput {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.into(),
            success: false,
        }
    }
}

/// Executes commands. The engine's only route to the OS.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

/// Production runner backed by `std::process::Command`.
///
/// Blocks the calling thread to completion; the engine is strictly
/// sequential and never runs two mutating commands concurrently.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|_| HwcapError::CommandFailed {
                command: render(program, args),
            })?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        })
    }
}

/// Run a command and return stdout, converting a non-zero exit into an
/// [`HwcapError::UnderlyingTool`] carrying the tool's own message.
pub fn check_output(runner: &dyn CommandRunner, program: &str, args: &[&str]) -> Result<String> {
    let output = runner.run(program, args)?;
    if output.success {
        return Ok(output.stdout);
    }
    let message = if output.stderr.trim().is_empty() {
        format!("exit code {:?}", output.exit_code)
    } else {
        output.stderr.trim().to_string()
    };
    Err(HwcapError::UnderlyingTool {
        tool: render(program, args),
        message,
    })
}

/// Run a probe command, reporting only whether it exited successfully.
/// Spawn failures count as probe failures.
pub fn run_ok(runner: &dyn CommandRunner, program: &str, args: &[&str]) -> bool {
    runner.run(program, args).map(|o| o.success).unwrap_or(false)
}

fn render(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}
