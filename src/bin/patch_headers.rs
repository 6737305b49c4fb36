//! `v5rt-patch-headers` entrypoint.
//!
//! Patches each input header and writes `<name>_patched.<ext>` into the
//! output directory. The batch aborts on the first file that fails, so
//! a partial run never leaves a mixed patched/unpatched include set
//! unnoticed.

use camino::Utf8PathBuf;
use clap::Parser;
use std::io::Write;
use v5rt_tools::cli::PatchArgs;
use v5rt_tools::error::{Result, ToolError};
use v5rt_tools::output::{exit_code_for_result, write_stderr_line};
use v5rt_tools::patch::{patch_header_file, patched_filename};

fn main() {
    let args = PatchArgs::parse();
    let mut stderr = std::io::stderr();
    let result = run(&args, &mut stderr);
    let exit_code = exit_code_for_result(result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(args: &PatchArgs, stderr: &mut dyn Write) -> Result<()> {
    let (headers, output_dir) = args.headers_and_output().ok_or_else(|| ToolError::Usage {
        message: "expected at least one header file followed by an output directory".to_owned(),
    })?;

    write_stderr_line(stderr, format!("Patching {} header(s)...", headers.len()));
    for header in headers {
        let output: Utf8PathBuf = output_dir.join(patched_filename(header));
        patch_header_file(header, &output, !args.no_include_rewrite)?;
    }
    Ok(())
}
