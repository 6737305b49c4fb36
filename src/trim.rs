//! Static archive trimming.
//!
//! Reduces `libv5rt.a` to a keep-list of object members: list the
//! archive's table of contents, extract the requested members into a
//! scoped temporary directory, optionally strip symbols and sections
//! from ELF members, and re-archive exactly the extracted members. The
//! external archiver and object-editing tools are driven through
//! [`CommandExecutor`], never reimplemented.

use crate::error::{Result, ToolError};
use crate::exec::{CommandExecutor, ensure_success};
use crate::output::write_stderr_line;
use camino::{Utf8Path, Utf8PathBuf};
use std::io::{Read, Write};

/// Magic bytes identifying an ELF object file.
const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];

/// Symbols and sections to remove from ELF members before re-archiving.
#[derive(Debug, Clone, Default)]
pub struct StripSpec {
    /// Path or name of the object-editing tool (objcopy).
    pub tool: String,
    /// Symbols passed as `--strip-symbol`.
    pub symbols: Vec<String>,
    /// Sections passed as `--remove-section`.
    pub sections: Vec<String>,
}

/// A single archive-trimming job.
#[derive(Debug)]
pub struct TrimRequest<'a> {
    /// The source static archive.
    pub archive: &'a Utf8Path,
    /// Path or name of the external archiver tool.
    pub archiver: &'a str,
    /// Member names to keep, in the order they should be re-archived.
    pub keep: &'a [String],
    /// The trimmed archive to create.
    pub output: &'a Utf8Path,
    /// Optional strip pass applied to extracted ELF members.
    pub strip: Option<&'a StripSpec>,
}

/// Trim `request.archive` down to the requested members.
///
/// The output archive's member set is exactly the intersection of the
/// keep-list and the members present in the input, in keep-list order.
/// Requested members absent from the input are reported and skipped.
///
/// # Errors
///
/// Returns [`ToolError::FileNotFound`] if the archive is missing,
/// [`ToolError::EmptyArchive`] if it reports zero members,
/// [`ToolError::NoMatchingMembers`] if the intersection is empty,
/// [`ToolError::StripFailed`] naming the member a strip failed on, and
/// [`ToolError::ExternalTool`] for any other archiver failure.
pub fn trim_archive(
    executor: &dyn CommandExecutor,
    request: &TrimRequest<'_>,
    stderr: &mut dyn Write,
) -> Result<()> {
    if !request.archive.is_file() {
        return Err(ToolError::FileNotFound {
            path: request.archive.to_owned(),
        });
    }

    let members = list_members(executor, request)?;
    let selected = select_members(request, &members, stderr)?;

    let workdir = tempfile::tempdir()?;
    let workdir_path = Utf8Path::from_path(workdir.path()).ok_or_else(|| {
        ToolError::Io(std::io::Error::other(
            "temporary directory path is not valid UTF-8",
        ))
    })?;

    extract_members(executor, request, &selected, workdir_path)?;

    if let Some(spec) = request.strip {
        strip_members(executor, spec, &selected, workdir_path, stderr)?;
    }

    create_archive(executor, request, &selected, workdir_path, stderr)
}

/// List the archive's table of contents via the archiver's `t` op.
fn list_members(executor: &dyn CommandExecutor, request: &TrimRequest<'_>) -> Result<Vec<String>> {
    let output = executor.run(request.archiver, &["t", request.archive.as_str()])?;
    ensure_success(request.archiver, &output)?;
    let members: Vec<String> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect();
    if members.is_empty() {
        return Err(ToolError::EmptyArchive {
            path: request.archive.to_owned(),
        });
    }
    Ok(members)
}

/// Intersect the keep-list with the actual member set, preserving
/// keep-list order. Absent members are reported, not fatal; an empty
/// intersection is.
fn select_members(
    request: &TrimRequest<'_>,
    members: &[String],
    stderr: &mut dyn Write,
) -> Result<Vec<String>> {
    let mut selected = Vec::new();
    for name in request.keep {
        if members.iter().any(|m| m == name) {
            selected.push(name.clone());
        } else {
            write_stderr_line(
                stderr,
                format!("warning: {name} not present in {}; skipping", request.archive),
            );
        }
    }
    if selected.is_empty() {
        return Err(ToolError::NoMatchingMembers {
            path: request.archive.to_owned(),
        });
    }
    Ok(selected)
}

/// Extract each selected member into the working directory.
///
/// The archiver writes members relative to its working directory, so it
/// runs with `workdir` as its cwd against the archive's absolute path.
fn extract_members(
    executor: &dyn CommandExecutor,
    request: &TrimRequest<'_>,
    selected: &[String],
    workdir: &Utf8Path,
) -> Result<()> {
    let absolute = request.archive.canonicalize_utf8()?;
    for member in selected {
        let output = executor.run_in(
            workdir.as_std_path(),
            request.archiver,
            &["x", absolute.as_str(), member],
        )?;
        if !output.status.success() {
            let reported = String::from_utf8_lossy(&output.stderr);
            return Err(ToolError::ExternalTool {
                tool: request.archiver.to_owned(),
                message: format!("extracting {member}: {}", reported.trim()),
            });
        }
    }
    Ok(())
}

/// Strip symbols/sections in place from every extracted ELF member.
///
/// Non-ELF members (e.g. linker scripts carried in the archive) are
/// left untouched.
fn strip_members(
    executor: &dyn CommandExecutor,
    spec: &StripSpec,
    selected: &[String],
    workdir: &Utf8Path,
    stderr: &mut dyn Write,
) -> Result<()> {
    for member in selected {
        let member_path = workdir.join(member);
        if !is_elf_file(&member_path)? {
            continue;
        }
        write_stderr_line(stderr, format!("Stripping {member}..."));
        let mut args: Vec<&str> = Vec::new();
        for symbol in &spec.symbols {
            args.push("--strip-symbol");
            args.push(symbol);
        }
        for section in &spec.sections {
            args.push("--remove-section");
            args.push(section);
        }
        args.push(member_path.as_str());
        let output = executor.run(&spec.tool, &args)?;
        if !output.status.success() {
            let reported = String::from_utf8_lossy(&output.stderr);
            return Err(ToolError::StripFailed {
                member: member.clone(),
                message: reported.trim().to_owned(),
            });
        }
    }
    Ok(())
}

/// Create the output archive from the extracted members, in order.
fn create_archive(
    executor: &dyn CommandExecutor,
    request: &TrimRequest<'_>,
    selected: &[String],
    workdir: &Utf8Path,
    stderr: &mut dyn Write,
) -> Result<()> {
    write_stderr_line(
        stderr,
        format!(
            "Creating {} with {} member(s)...",
            request.output,
            selected.len()
        ),
    );
    let member_paths: Vec<Utf8PathBuf> = selected.iter().map(|m| workdir.join(m)).collect();
    let mut args: Vec<&str> = vec!["rcs", request.output.as_str()];
    args.extend(member_paths.iter().map(|p| p.as_str()));
    let output = executor.run(request.archiver, &args)?;
    ensure_success(request.archiver, &output)
}

/// Check whether the file starts with the ELF magic byte sequence.
fn is_elf_file(path: &Utf8Path) -> Result<bool> {
    let mut file = std::fs::File::open(path)?;
    let mut magic = [0u8; 4];
    match file.read_exact(&mut magic) {
        Ok(()) => Ok(magic == ELF_MAGIC),
        // Shorter than four bytes cannot be an ELF object.
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(ToolError::Io(e)),
    }
}
