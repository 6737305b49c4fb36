//! SDK archive extraction and keep-list resolution.
//!
//! The validated zip is always unpacked into a scoped temporary
//! directory first, so a failed extraction never leaves a half-written
//! destination behind. From there either the whole tree is merge-copied
//! into the destination, or each keep-list entry is resolved by
//! basename against the SDK's two content directories and copied
//! individually.

use crate::error::{Result, ToolError};
use crate::output::write_stderr_line;
use camino::Utf8Path;
use std::io::Write;
use std::path::Path;

/// Directories inside the extracted tree searched for keep-list
/// entries, in priority order. A name present in both resolves to the
/// first.
pub const SDK_SEARCH_DIRS: [&str; 2] = ["libv5rt/vexv5", "libv5rt/vexv5/include"];

/// Extract `archive` into `dest_dir`, optionally restricted to `keep`.
///
/// With an empty keep-list the entire extracted tree is merge-copied
/// into `dest_dir`. Otherwise each entry is matched by basename against
/// [`SDK_SEARCH_DIRS`] and the first hit is copied (files directly,
/// directories recursively).
///
/// # Errors
///
/// Returns [`ToolError::FileNotFound`] if the archive is missing,
/// [`ToolError::InvalidArchive`] if it is not a valid zip, and
/// [`ToolError::EntryNotFound`] naming the first keep-list entry that
/// resolves in neither search directory.
pub fn extract_sdk(
    archive: &Utf8Path,
    dest_dir: &Utf8Path,
    keep: &[String],
    stderr: &mut dyn Write,
) -> Result<()> {
    if !archive.is_file() {
        return Err(ToolError::FileNotFound {
            path: archive.to_owned(),
        });
    }

    // Scoped staging area; removed on every exit path.
    let staging = tempfile::tempdir()?;
    unpack_zip(archive, staging.path())?;
    std::fs::create_dir_all(dest_dir)?;

    if keep.is_empty() {
        write_stderr_line(stderr, format!("Copying extracted SDK to {dest_dir}..."));
        return merge_copy_dir(staging.path(), dest_dir.as_std_path());
    }

    for entry in keep {
        copy_keep_entry(staging.path(), dest_dir, entry, stderr)?;
    }
    Ok(())
}

/// Resolve one keep-list entry by basename and copy it into `dest_dir`.
fn copy_keep_entry(
    staging: &Path,
    dest_dir: &Utf8Path,
    entry: &str,
    stderr: &mut dyn Write,
) -> Result<()> {
    // Lookup is by basename only; path components supplied by the
    // caller are informational.
    let name = Path::new(entry)
        .file_name()
        .ok_or_else(|| ToolError::EntryNotFound {
            entry: entry.to_owned(),
        })?;

    for search_dir in SDK_SEARCH_DIRS {
        let candidate = staging.join(search_dir).join(name);
        if candidate.is_file() {
            write_stderr_line(stderr, format!("Copying {}...", name.to_string_lossy()));
            std::fs::copy(&candidate, dest_dir.as_std_path().join(name))?;
            return Ok(());
        }
        if candidate.is_dir() {
            write_stderr_line(stderr, format!("Copying {}/...", name.to_string_lossy()));
            return merge_copy_dir(&candidate, &dest_dir.as_std_path().join(name));
        }
    }

    Err(ToolError::EntryNotFound {
        entry: entry.to_owned(),
    })
}

/// Unpack a zip archive into `dest`, validating entry paths.
///
/// Entries that would escape `dest` via absolute paths or `..`
/// components are rejected before anything is written.
pub fn unpack_zip(archive: &Utf8Path, dest: &Path) -> Result<()> {
    let file = std::fs::File::open(archive).map_err(ToolError::Io)?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| invalid_archive(archive, &e))?;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(|e| invalid_archive(archive, &e))?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(ToolError::PathTraversal {
                entry: entry.name().to_owned(),
            });
        };
        let out_path = dest.join(relative);
        if entry.is_dir() {
            std::fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out_file = std::fs::File::create(&out_path)?;
        std::io::copy(&mut entry, &mut out_file)?;
    }
    Ok(())
}

/// Map a zip error to the matching semantic variant.
fn invalid_archive(archive: &Utf8Path, err: &zip::result::ZipError) -> ToolError {
    match err {
        zip::result::ZipError::Io(io_err) => {
            ToolError::Io(std::io::Error::new(io_err.kind(), io_err.to_string()))
        }
        other => ToolError::InvalidArchive {
            path: archive.to_owned(),
            reason: other.to_string(),
        },
    }
}

/// Recursively copy `src` into `dest`, merging with existing contents.
///
/// Existing files with the same name are overwritten; other destination
/// contents are left in place.
pub fn merge_copy_dir(src: &Path, dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            merge_copy_dir(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
