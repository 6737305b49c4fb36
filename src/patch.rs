//! Textual patching of SDK C headers.
//!
//! Two independent transforms over raw header text:
//!
//! 1. Rewrite `#include "v5_*.h"` directives to their `_patched`
//!    siblings, leaving every other include untouched.
//! 2. Insert `__attribute__((pcs("aapcs")))` after the closing
//!    parenthesis of each function declaration or definition, ahead of
//!    any pre-existing attributes. Sites already carrying the marker
//!    are left unmodified, so patching is idempotent.
//!
//! This is a regex-level transform: it does not understand preprocessor
//! conditionals, comments, or string literals containing similar
//! syntax. Such occurrences are a documented false-positive risk.

use crate::error::{Result, ToolError};
use camino::Utf8Path;
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Prefix identifying SDK-local headers whose includes are rewritten.
const SDK_HEADER_PREFIX: &str = "v5_";

/// The calling-convention marker inserted at each declaration site.
const CALLING_CONVENTION_ATTR: &str = r#"__attribute__((pcs("aapcs")))"#;

/// The marker text whose presence makes a site a no-op.
const CALLING_CONVENTION_MARKER: &str = r#"pcs("aapcs")"#;

/// `#include "name.ext"` directive, capturing the quoted name.
fn include_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(#include\s+")([^"]+)(")"#).expect("include pattern is valid")
    })
}

/// Close-parenthesis of a parameter list, optionally followed by
/// existing attribute annotations, then a `;` or `{` terminator.
///
/// The attribute body allows one level of nested parentheses so that
/// annotations like `pcs("aapcs")` round-trip; `.` matches newlines so
/// declarations split across lines are still found.
fn signature_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)\)(\s*)((?:__attribute__\s*\(\((?:[^()]|\([^()]*\))*\)\)\s*)*)(\s*)(;|\{)")
            .expect("signature pattern is valid")
    })
}

/// Apply both header transforms to `content` and return the result.
///
/// `rewrite_includes` controls the optional include-rewrite pass; the
/// calling-convention injection always runs.
#[must_use]
pub fn patch_header_text(content: &str, rewrite_includes: bool) -> String {
    let content = if rewrite_includes {
        rewrite_sdk_includes(content)
    } else {
        content.to_owned()
    };
    inject_calling_convention(&content)
}

/// Rewrite `#include "v5_*.h"` to `#include "v5_*_patched.h"`.
fn rewrite_sdk_includes(content: &str) -> String {
    include_regex()
        .replace_all(content, |caps: &Captures<'_>| {
            let name = &caps[2];
            if !name.starts_with(SDK_HEADER_PREFIX) {
                return caps[0].to_owned();
            }
            let (base, ext) = split_dot_extension(name);
            // Already rewritten; keeps the transform idempotent.
            if base.ends_with("_patched") {
                return caps[0].to_owned();
            }
            format!("{}{base}_patched{ext}{}", &caps[1], &caps[3])
        })
        .into_owned()
}

/// Insert the calling-convention attribute at each declaration site.
fn inject_calling_convention(content: &str) -> String {
    signature_regex()
        .replace_all(content, |caps: &Captures<'_>| {
            let ws_after_paren = &caps[1];
            let existing_attrs = &caps[2];
            let ws_after_attrs = &caps[3];
            let ending = &caps[4];

            if existing_attrs.contains(CALLING_CONVENTION_MARKER) {
                return caps[0].to_owned();
            }

            let mut patched = format!("){ws_after_paren} {CALLING_CONVENTION_ATTR}");
            if !existing_attrs.is_empty() {
                patched.push(' ');
                patched.push_str(existing_attrs);
            }
            patched.push_str(ws_after_attrs);
            patched.push_str(ending);
            patched
        })
        .into_owned()
}

/// Split `name` into (base, extension-with-dot).
///
/// A name without a dot, or with only a leading dot, has no extension.
fn split_dot_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(index) if index > 0 => name.split_at(index),
        _ => (name, ""),
    }
}

/// Derive the `_patched` output filename for a header path.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use v5rt_tools::patch::patched_filename;
///
/// assert_eq!(patched_filename(Utf8Path::new("v5_api.h")), "v5_api_patched.h");
/// ```
#[must_use]
pub fn patched_filename(path: &Utf8Path) -> String {
    let name = path.file_name().unwrap_or(path.as_str());
    let (base, ext) = split_dot_extension(name);
    format!("{base}_patched{ext}")
}

/// Patch a single header file from `input` to `output`.
///
/// The output's parent directory is created if absent. The input file
/// is never modified.
///
/// # Errors
///
/// Returns [`ToolError::PatchFailed`] naming the input when it cannot
/// be read, and [`ToolError::Io`] when the output cannot be written.
pub fn patch_header_file(
    input: &Utf8Path,
    output: &Utf8Path,
    rewrite_includes: bool,
) -> Result<()> {
    let content = std::fs::read_to_string(input).map_err(|e| ToolError::PatchFailed {
        path: input.to_owned(),
        reason: e.to_string(),
    })?;
    let patched = patch_header_text(&content, rewrite_includes);
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, patched)?;
    Ok(())
}
