//! Error types shared by the v5rt build utilities.
//!
//! Every failure a tool can hit maps to one semantic variant carrying
//! the offending path, entry, or tool name. Binaries convert a
//! [`ToolError`] to a process exit code only at the process boundary;
//! library code propagates it with `?`.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while fetching, extracting, patching, or
/// trimming the SDK.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The command line was malformed (wrong argument count or shape).
    #[error("usage error: {message}")]
    Usage {
        /// Description of what was wrong with the arguments.
        message: String,
    },

    /// An HTTP request failed at the transport layer.
    #[error("download failed for {url}: {reason}")]
    Download {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested SDK release does not exist (HTTP 404).
    #[error("SDK release not found: {url}")]
    ReleaseNotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// A supplied digest string was not 64 lowercase hex characters.
    #[error("invalid SHA-256 digest: {reason}")]
    InvalidDigest {
        /// Description of the validation failure.
        reason: String,
    },

    /// The downloaded archive's digest did not match the expected value.
    ///
    /// The untrusted download has already been deleted when this is
    /// reported.
    #[error("SHA-256 mismatch for {path}: expected {expected}, got {actual}")]
    DigestMismatch {
        /// The file whose digest was checked.
        path: Utf8PathBuf,
        /// The caller-supplied expected digest.
        expected: String,
        /// The digest actually computed.
        actual: String,
    },

    /// A required input file does not exist.
    #[error("file not found: {path}")]
    FileNotFound {
        /// The missing path.
        path: Utf8PathBuf,
    },

    /// A required input file exists but cannot be read.
    #[error("permission denied reading {path}")]
    PermissionDenied {
        /// The unreadable path.
        path: Utf8PathBuf,
    },

    /// The archive is not a valid zip file.
    #[error("{path} is not a valid zip archive: {reason}")]
    InvalidArchive {
        /// The archive path.
        path: Utf8PathBuf,
        /// Description of the format error.
        reason: String,
    },

    /// A zip entry attempted to escape the extraction directory.
    #[error("path traversal detected in archive entry: {entry}")]
    PathTraversal {
        /// The offending entry name.
        entry: String,
    },

    /// A keep-list entry was found in neither search directory.
    #[error("requested entry {entry} not found in the extracted SDK")]
    EntryNotFound {
        /// The entry that could not be resolved.
        entry: String,
    },

    /// The static archive reported no members.
    #[error("no object files found in {path}")]
    EmptyArchive {
        /// The archive that was listed.
        path: Utf8PathBuf,
    },

    /// None of the requested members exist in the static archive.
    #[error("none of the requested object files exist in {path}")]
    NoMatchingMembers {
        /// The archive that was searched.
        path: Utf8PathBuf,
    },

    /// An external tool (archiver, objcopy, strip) exited nonzero.
    #[error("{tool} failed: {message}")]
    ExternalTool {
        /// The tool that failed.
        tool: String,
        /// The tool's reported error.
        message: String,
    },

    /// Stripping an extracted archive member failed.
    #[error("failed to strip {member}: {message}")]
    StripFailed {
        /// The member being stripped.
        member: String,
        /// The tool's reported error.
        message: String,
    },

    /// Patching a header file failed.
    #[error("failed to patch {path}: {reason}")]
    PatchFailed {
        /// The header being patched.
        path: Utf8PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`ToolError`].
pub type Result<T> = std::result::Result<T, ToolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_not_found_names_the_entry() {
        let err = ToolError::EntryNotFound {
            entry: "c.h".to_owned(),
        };
        assert!(err.to_string().contains("c.h"));
    }

    #[test]
    fn digest_mismatch_reports_both_digests() {
        let err = ToolError::DigestMismatch {
            path: Utf8PathBuf::from("sdk.zip"),
            expected: "aa".repeat(32),
            actual: "bb".repeat(32),
        };
        let msg = err.to_string();
        assert!(msg.contains(&"aa".repeat(32)));
        assert!(msg.contains(&"bb".repeat(32)));
    }

    #[test]
    fn external_tool_error_includes_tool_name() {
        let err = ToolError::ExternalTool {
            tool: "arm-none-eabi-ar".to_owned(),
            message: "malformed archive".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("arm-none-eabi-ar"));
        assert!(msg.contains("malformed archive"));
    }
}
