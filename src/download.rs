//! SDK archive download over HTTPS.
//!
//! Provides a trait-based abstraction for fetching the vendor SDK zip,
//! enabling dependency injection for testing. The vendor CDN rejects
//! requests without a browser-like user agent, so one is sent on every
//! request.

use crate::error::{Result, ToolError};
use camino::Utf8Path;
use std::io::Read;
use std::sync::OnceLock;
use std::time::Duration;

/// Base URL the vendor publishes SDK releases under.
const SDK_BASE_URL: &str = "https://content.vexrobotics.com/vexos/public/V5/vscode/sdk/cpp";

/// Browser-like user agent accepted by the vendor CDN.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/114.0.0.0 Safari/537.36";

/// Network timeout for SDK downloads.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for downloading an SDK release archive.
///
/// Abstracting the transport allows tests to exercise the fetch
/// pipeline without network access.
pub trait SdkDownloader {
    /// Download the archive for `release` into `dest`.
    ///
    /// The response body is streamed to the destination file in chunks;
    /// the whole archive is never buffered in memory.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::ReleaseNotFound`] for HTTP 404,
    /// [`ToolError::Download`] for other transport failures, and
    /// [`ToolError::Io`] if the destination cannot be written. A
    /// transport failure mid-body leaves no partial file behind.
    fn download_sdk(&self, release: &str, dest: &Utf8Path) -> Result<()>;
}

/// HTTP-based downloader using `ureq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpDownloader;

impl HttpDownloader {
    /// Construct the download URL for a given release identifier.
    ///
    /// The identifier is used verbatim, matching the vendor's naming.
    ///
    /// # Examples
    ///
    /// ```
    /// use v5rt_tools::download::HttpDownloader;
    ///
    /// let url = HttpDownloader::sdk_url("V5_20240802_15_00_00");
    /// assert!(url.ends_with("/V5_20240802_15_00_00.zip"));
    /// ```
    #[must_use]
    pub fn sdk_url(release: &str) -> String {
        format!("{SDK_BASE_URL}/{release}.zip")
    }
}

impl SdkDownloader for HttpDownloader {
    fn download_sdk(&self, release: &str, dest: &Utf8Path) -> Result<()> {
        let url = Self::sdk_url(release);
        log::trace!("downloading {url}");
        let response = http_agent()
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| map_ureq_error(&url, &e))?;
        stream_to_file(&url, &mut response.into_body().as_reader(), dest)
    }
}

/// Stream a response body into `dest` in chunks.
///
/// A read failure mid-body removes the partially written file before
/// surfacing as a transport error, so no partial archive is retained.
fn stream_to_file(url: &str, body: &mut dyn Read, dest: &Utf8Path) -> Result<()> {
    let mut file = std::fs::File::create(dest)?;
    if let Err(err) = std::io::copy(body, &mut file) {
        drop(file);
        // Removal is best effort; the transport error takes precedence.
        let _ = std::fs::remove_file(dest);
        return Err(ToolError::Download {
            url: url.to_owned(),
            reason: err.to_string(),
        });
    }
    Ok(())
}

/// Shared `ureq` agent with request timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(DOWNLOAD_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to a [`ToolError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> ToolError {
    match err {
        ureq::Error::StatusCode(404) => ToolError::ReleaseNotFound {
            url: url.to_owned(),
        },
        other => ToolError::Download {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
