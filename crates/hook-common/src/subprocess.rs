//! Subprocess execution helpers.

use anyhow::{Context, Result};
use std::process::Command;

/// Captured output of a finished subprocess.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// Run a command and capture its output.
///
/// The command string is split on whitespace and spawned directly, without
/// a shell, so individual arguments must not contain whitespace (callers
/// pass git ref names and fixed flags, which never do). Blocks until the
/// process exits; there is no timeout.
pub fn run_command(command: &str) -> Result<CommandOutput> {
    let mut parts = command.split_whitespace();
    let program = parts.next().context("empty command")?;

    let output = Command::new(program)
        .args(parts)
        .output()
        .with_context(|| format!("Failed to run command: {}", command))?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).trim_end().to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
        success: output.status.success(),
    })
}

/// Run a `gh` subcommand.
pub fn gh(args: &str) -> Result<CommandOutput> {
    run_command(&format!("gh {}", args))
}

/// Run a `git` subcommand.
pub fn git(args: &str) -> Result<CommandOutput> {
    run_command(&format!("git {}", args))
}

/// Check whether a tool is discoverable on PATH.
pub fn is_installed(tool: &str) -> bool {
    run_command(&format!("which {}", tool))
        .map(|r| r.success)
        .unwrap_or(false)
}
