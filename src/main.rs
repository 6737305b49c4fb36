//! `v5rt-get` entrypoint.
//!
//! Downloads a VEX V5 SDK release zip, verifies its SHA-256 digest
//! against the caller-supplied value, and extracts the requested
//! entries (or the whole tree) into the output directory. A digest
//! mismatch deletes the untrusted download and fails the run.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use std::io::Write;
use v5rt_tools::cli::GetArgs;
use v5rt_tools::digest::{Sha256Digest, compute_sha256};
use v5rt_tools::download::{HttpDownloader, SdkDownloader};
use v5rt_tools::error::{Result, ToolError};
use v5rt_tools::extract::extract_sdk;
use v5rt_tools::output::{exit_code_for_result, write_stderr_line};

fn main() {
    let args = GetArgs::parse();
    let mut stderr = std::io::stderr();
    let result = run(&args, &HttpDownloader, Utf8Path::new("."), &mut stderr);
    let exit_code = exit_code_for_result(result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Fetch, verify, and extract one SDK release.
///
/// The archive is downloaded to `<release>.zip` under `download_dir`
/// and left in place on success.
fn run(
    args: &GetArgs,
    downloader: &dyn SdkDownloader,
    download_dir: &Utf8Path,
    stderr: &mut dyn Write,
) -> Result<()> {
    let (keep, output_dir) = args.keep_and_output().ok_or_else(|| ToolError::Usage {
        message: "expected [keep-entry ...] followed by an output directory".to_owned(),
    })?;

    // Validate the expected digest before any side effects.
    let expected = Sha256Digest::try_from(args.digest.as_str())?;

    report_request(&args.release, keep, stderr);

    let archive = download_dir.join(format!("{}.zip", args.release));
    downloader.download_sdk(&args.release, &archive)?;

    verify_download(&archive, &expected)?;

    extract_sdk(&archive, &output_dir, keep, stderr)?;
    write_stderr_line(stderr, format!("SDK {} ready in {output_dir}", args.release));
    Ok(())
}

/// Report what was requested, splitting the keep-list into headers and
/// object files the way SDK build scripts pass them.
fn report_request(release: &str, keep: &[String], stderr: &mut dyn Write) {
    if keep.is_empty() {
        write_stderr_line(stderr, format!("Fetching SDK {release} (full tree)..."));
        return;
    }
    let headers = keep.iter().filter(|k| k.ends_with(".h")).count();
    let objects = keep.iter().filter(|k| k.ends_with(".c.obj")).count();
    let other = keep.len() - headers - objects;
    write_stderr_line(
        stderr,
        format!(
            "Fetching SDK {release} ({headers} header(s), {objects} object file(s), {other} other)..."
        ),
    );
}

/// Compare the download's digest against the expected value, deleting
/// the file on mismatch.
fn verify_download(archive: &Utf8PathBuf, expected: &Sha256Digest) -> Result<()> {
    let actual = compute_sha256(archive)?;
    if &actual != expected {
        std::fs::remove_file(archive)?;
        return Err(ToolError::DigestMismatch {
            path: archive.clone(),
            expected: expected.as_str().to_owned(),
            actual: actual.as_str().to_owned(),
        });
    }
    Ok(())
}
