//! `v5rt-strip` entrypoint.
//!
//! Runs an external strip tool over a static archive with flags read
//! from an options file, producing one or two copies of the output.

use clap::Parser;
use std::io::Write;
use v5rt_tools::cli::StripArgs;
use v5rt_tools::error::Result;
use v5rt_tools::exec::{CommandExecutor, SystemCommandExecutor};
use v5rt_tools::output::exit_code_for_result;
use v5rt_tools::strip::run_strip_tool;

fn main() {
    let args = StripArgs::parse();
    let mut stderr = std::io::stderr();
    let result = run(&args, &SystemCommandExecutor, &mut stderr);
    let exit_code = exit_code_for_result(result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(args: &StripArgs, executor: &dyn CommandExecutor, stderr: &mut dyn Write) -> Result<()> {
    run_strip_tool(
        executor,
        &args.tool,
        &args.input,
        &args.options_file,
        &args.output,
        args.second_output.as_deref(),
        stderr,
    )
}
