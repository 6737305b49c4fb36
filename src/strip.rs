//! Wrapper around an external strip tool.
//!
//! Reads a one-line options file, passes its whitespace-separated flags
//! verbatim to the strip tool, and produces one or two copies of the
//! stripped output.

use crate::error::{Result, ToolError};
use crate::exec::{CommandExecutor, ensure_success};
use crate::output::write_stderr_line;
use camino::Utf8Path;
use std::io::Write;

/// Run the strip tool over `input`, writing `primary_out` and
/// optionally copying it to `secondary_out`.
///
/// The options file's flags are not interpreted; they are handed to the
/// tool exactly as written. Parent directories of both outputs are
/// created as needed.
///
/// # Errors
///
/// Returns [`ToolError::FileNotFound`] if the input or options file is
/// missing, and [`ToolError::ExternalTool`] if the strip tool exits
/// nonzero.
pub fn run_strip_tool(
    executor: &dyn CommandExecutor,
    tool: &str,
    input: &Utf8Path,
    options_file: &Utf8Path,
    primary_out: &Utf8Path,
    secondary_out: Option<&Utf8Path>,
    stderr: &mut dyn Write,
) -> Result<()> {
    if !input.is_file() {
        return Err(ToolError::FileNotFound {
            path: input.to_owned(),
        });
    }
    if !options_file.is_file() {
        return Err(ToolError::FileNotFound {
            path: options_file.to_owned(),
        });
    }

    let options = std::fs::read_to_string(options_file)?;

    for out in std::iter::once(primary_out).chain(secondary_out) {
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)?;
        }
    }

    write_stderr_line(stderr, format!("Stripping {input} -> {primary_out}..."));
    let mut args: Vec<&str> = options.split_whitespace().collect();
    args.push(input.as_str());
    args.push("-o");
    args.push(primary_out.as_str());
    let output = executor.run(tool, &args)?;
    ensure_success(tool, &output)?;

    if let Some(second) = secondary_out {
        if second != primary_out {
            std::fs::copy(primary_out, second)?;
        }
    }
    Ok(())
}
