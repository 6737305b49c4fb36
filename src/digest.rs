//! Streaming SHA-256 computation and digest validation.
//!
//! The downloaded SDK archive is only trusted once its digest matches
//! the caller-supplied value. Hashing reads the file in fixed-size
//! blocks so archives of any size are handled without buffering the
//! whole file.

use crate::error::{Result, ToolError};
use camino::Utf8Path;
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::Read;

/// Expected length of a hex-encoded SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

/// Block size for incremental hashing.
const HASH_BLOCK_SIZE: usize = 8192;

/// A validated hex-encoded SHA-256 digest string.
///
/// Always 64 lowercase hexadecimal characters; comparison is exact and
/// case-sensitive, so mixed-case input is rejected up front rather than
/// silently normalised.
///
/// # Examples
///
/// ```
/// use v5rt_tools::digest::Sha256Digest;
///
/// let hex = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";
/// let digest = Sha256Digest::try_from(hex)?;
/// assert_eq!(digest.as_str(), hex);
/// assert!(Sha256Digest::try_from("not a digest").is_err());
/// # Ok::<(), v5rt_tools::error::ToolError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap a string already known to be valid lowercase hex.
    ///
    /// Used for hasher output, which is valid by construction.
    fn new_unchecked(hex: String) -> Self {
        Self(hex)
    }
}

impl TryFrom<&str> for Sha256Digest {
    type Error = ToolError;

    fn try_from(value: &str) -> Result<Self> {
        validate_sha256(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl AsRef<str> for Sha256Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate that `value` is a well-formed lowercase hex SHA-256 digest.
fn validate_sha256(value: &str) -> Result<()> {
    if value.len() != DIGEST_HEX_LEN {
        return Err(ToolError::InvalidDigest {
            reason: format!(
                "expected {DIGEST_HEX_LEN} hex characters, got {}",
                value.len()
            ),
        });
    }
    if let Some(bad) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ToolError::InvalidDigest {
            reason: format!("non-hex character '{bad}'"),
        });
    }
    if value.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ToolError::InvalidDigest {
            reason: "digest must be lowercase".to_owned(),
        });
    }
    Ok(())
}

/// Compute the SHA-256 digest of the file at `path`.
///
/// Reads the file in [`HASH_BLOCK_SIZE`] blocks and feeds the hasher
/// incrementally.
///
/// # Errors
///
/// Returns [`ToolError::FileNotFound`] when the file does not exist,
/// [`ToolError::PermissionDenied`] when it cannot be opened for
/// reading, and [`ToolError::Io`] for other read failures.
pub fn compute_sha256(path: &Utf8Path) -> Result<Sha256Digest> {
    let mut file = std::fs::File::open(path).map_err(|e| classify_open_error(path, &e))?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; HASH_BLOCK_SIZE];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    // sha2 output formats as 64 lowercase hex characters.
    Ok(Sha256Digest::new_unchecked(format!(
        "{:x}",
        hasher.finalize()
    )))
}

/// Map an open failure to the matching semantic error variant.
fn classify_open_error(path: &Utf8Path, err: &std::io::Error) -> ToolError {
    match err.kind() {
        std::io::ErrorKind::NotFound => ToolError::FileNotFound {
            path: path.to_owned(),
        },
        std::io::ErrorKind::PermissionDenied => ToolError::PermissionDenied {
            path: path.to_owned(),
        },
        kind => ToolError::Io(std::io::Error::new(kind, err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    /// SHA-256 of the ASCII string "hello world".
    const HELLO_WORLD_SHA256: &str =
        "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    fn temp_file_with(content: &[u8]) -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("input.bin");
        std::fs::write(&path, content).expect("write input");
        let utf8 = Utf8PathBuf::try_from(path).expect("utf-8 temp path");
        (dir, utf8)
    }

    #[test]
    fn computes_known_digest() {
        let (_dir, path) = temp_file_with(b"hello world");
        let digest = compute_sha256(&path).expect("digest");
        assert_eq!(digest.as_str(), HELLO_WORLD_SHA256);
    }

    #[test]
    fn single_byte_mutation_changes_digest() {
        let (_dir, path) = temp_file_with(b"hello world");
        let original = compute_sha256(&path).expect("digest");
        std::fs::write(&path, b"hello worle").expect("mutate");
        let mutated = compute_sha256(&path).expect("digest");
        assert_ne!(original, mutated);
    }

    #[test]
    fn missing_file_is_classified() {
        let result = compute_sha256(Utf8Path::new("/nonexistent/sdk.zip"));
        assert!(matches!(result, Err(ToolError::FileNotFound { .. })));
    }

    #[test]
    fn permission_denied_is_classified() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let classified = classify_open_error(Utf8Path::new("/locked/sdk.zip"), &err);
        assert!(matches!(
            classified,
            ToolError::PermissionDenied { ref path } if path == "/locked/sdk.zip"
        ));
    }

    #[test]
    fn other_open_failures_stay_io_errors() {
        let err = std::io::Error::new(std::io::ErrorKind::Interrupted, "interrupted");
        let classified = classify_open_error(Utf8Path::new("/sdk.zip"), &err);
        assert!(matches!(classified, ToolError::Io(_)));
    }

    #[test]
    fn accepts_valid_sixty_four_char_hex() {
        let hex = "a".repeat(64);
        assert!(Sha256Digest::try_from(hex.as_str()).is_ok());
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(Sha256Digest::try_from("abcdef").is_err());
        let long = "a".repeat(65);
        assert!(Sha256Digest::try_from(long.as_str()).is_err());
    }

    #[test]
    fn rejects_non_hex_characters() {
        let mut bad = "a".repeat(63);
        bad.push('g');
        assert!(Sha256Digest::try_from(bad.as_str()).is_err());
    }

    #[test]
    fn rejects_uppercase_hex() {
        let bad = "A".repeat(64);
        assert!(Sha256Digest::try_from(bad.as_str()).is_err());
    }

    #[test]
    fn display_shows_full_digest() {
        let digest =
            Sha256Digest::try_from(HELLO_WORLD_SHA256).expect("known good");
        assert_eq!(format!("{digest}"), HELLO_WORLD_SHA256);
    }
}
