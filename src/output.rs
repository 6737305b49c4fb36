//! Progress reporting and process exit handling.
//!
//! Progress lines are written through a caller-supplied writer so tests
//! can capture them; errors become a process exit code only here, at
//! the boundary.

use crate::error::Result;
use std::io::Write;

/// Write one line to the given writer, ignoring write failures.
///
/// Reporting is best-effort; a broken stderr pipe must not turn a
/// successful run into a failure.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Convert a run result into a process exit code, printing any error.
///
/// Success maps to 0; every failure prints its message and maps to 1,
/// the sole error channel the invoking build system sees.
pub fn exit_code_for_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;

    #[test]
    fn success_maps_to_zero_with_no_output() {
        let mut stderr = Vec::new();
        assert_eq!(exit_code_for_result(Ok(()), &mut stderr), 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn failure_maps_to_one_and_prints_the_error() {
        let err = ToolError::EntryNotFound {
            entry: "c.h".to_owned(),
        };
        let mut stderr = Vec::new();
        assert_eq!(exit_code_for_result(Err(err), &mut stderr), 1);
        let text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert!(text.contains("c.h"));
    }
}
