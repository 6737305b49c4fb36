//! Shared test utilities for the v5rt tools.

use crate::error::Result;
use crate::exec::CommandExecutor;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::process::{ExitStatus, Output};

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Creates a successful command `Output` with the given stdout.
pub fn success_output(stdout: &str) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.as_bytes().to_vec(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Handler for one scripted command invocation.
///
/// Receives the command, its arguments, and the working directory when
/// the call came through `run_in`. Handlers assert on the invocation
/// and may create files (e.g. to simulate archiver member extraction)
/// before returning the command output.
pub type CallHandler = Box<dyn FnOnce(&str, &[&str], Option<&Path>) -> Result<Output>>;

/// A scripted implementation of `CommandExecutor` for testing.
///
/// Consumes one queued handler per invocation, allowing tests to verify
/// tool orchestration without running real binaries.
pub struct ScriptedExecutor {
    script: RefCell<VecDeque<CallHandler>>,
}

impl ScriptedExecutor {
    /// Creates a new `ScriptedExecutor` with the given handlers.
    pub fn new(script: Vec<CallHandler>) -> Self {
        Self {
            script: RefCell::new(script.into()),
        }
    }

    /// Asserts that every scripted invocation has been consumed.
    ///
    /// # Panics
    ///
    /// Panics if handlers remain unconsumed.
    pub fn assert_finished(&self) {
        assert!(
            self.script.borrow().is_empty(),
            "expected no further command invocations"
        );
    }

    fn next_handler(&self, cmd: &str) -> CallHandler {
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected command invocation: {cmd}"))
    }
}

impl CommandExecutor for ScriptedExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        self.next_handler(cmd)(cmd, args, None)
    }

    fn run_in(&self, dir: &Path, cmd: &str, args: &[&str]) -> Result<Output> {
        self.next_handler(cmd)(cmd, args, Some(dir))
    }
}
