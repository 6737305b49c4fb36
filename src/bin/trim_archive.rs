//! `v5rt-trim` entrypoint.
//!
//! Trims a static archive to the requested object members using an
//! external archiver tool, optionally stripping symbols and sections
//! from ELF members first.

use clap::Parser;
use std::io::Write;
use v5rt_tools::cli::TrimArgs;
use v5rt_tools::error::{Result, ToolError};
use v5rt_tools::exec::{CommandExecutor, SystemCommandExecutor};
use v5rt_tools::output::exit_code_for_result;
use v5rt_tools::trim::{TrimRequest, trim_archive};

fn main() {
    let args = TrimArgs::parse();
    let mut stderr = std::io::stderr();
    let result = run(&args, &SystemCommandExecutor, &mut stderr);
    let exit_code = exit_code_for_result(result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(args: &TrimArgs, executor: &dyn CommandExecutor, stderr: &mut dyn Write) -> Result<()> {
    let (members, output) = args.members_and_output().ok_or_else(|| ToolError::Usage {
        message: "expected at least one object name followed by an output archive".to_owned(),
    })?;
    let strip = args.strip_spec();
    let request = TrimRequest {
        archive: &args.archive,
        archiver: &args.archiver,
        keep: members,
        output: &output,
        strip: strip.as_ref(),
    };
    trim_archive(executor, &request, stderr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn output_archive_alone_is_a_usage_error() {
        let args = TrimArgs {
            archive: Utf8PathBuf::from("libv5rt.a"),
            archiver: "ar".to_owned(),
            names: vec!["libv5.a".to_owned()],
            strip_tool: None,
            symbols: Vec::new(),
            sections: Vec::new(),
        };
        let mut stderr = Vec::new();
        let err = run(&args, &SystemCommandExecutor, &mut stderr).expect_err("expected usage");
        assert!(matches!(err, ToolError::Usage { .. }));
    }
}
