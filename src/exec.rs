//! Abstraction for running external toolchain commands.
//!
//! The trimmer and strip wrapper drive the external archiver and
//! object-editing tools through this narrow interface so their logic
//! can be tested without invoking real binaries.

use crate::error::{Result, ToolError};
use std::path::Path;
use std::process::{Command, Output};

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Run a command with arguments and return the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the
    /// command.
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output>;

    /// Run a command with its working directory set to `dir`.
    ///
    /// Used for archiver operations that write member files relative to
    /// the current directory; the calling process's own working
    /// directory is never changed.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the
    /// command.
    fn run_in(&self, dir: &Path, cmd: &str, args: &[&str]) -> Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        Command::new(cmd).args(args).output().map_err(ToolError::from)
    }

    fn run_in(&self, dir: &Path, cmd: &str, args: &[&str]) -> Result<Output> {
        Command::new(cmd)
            .args(args)
            .current_dir(dir)
            .output()
            .map_err(ToolError::from)
    }
}

/// Map a nonzero exit to [`ToolError::ExternalTool`] carrying the
/// tool's reported error.
///
/// # Errors
///
/// Returns [`ToolError::ExternalTool`] when the command exited nonzero.
pub fn ensure_success(tool: &str, output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(ToolError::ExternalTool {
        tool: tool.to_owned(),
        message: stderr.trim().to_owned(),
    })
}
