//! Build-support utilities for the VEX V5 runtime SDK.
//!
//! This crate backs four small build-time binaries: `v5rt-get` fetches
//! a vendor SDK release, verifies its SHA-256 digest, and extracts a
//! selection of its entries; `v5rt-patch-headers` inserts the AAPCS
//! calling-convention attribute into C headers; `v5rt-trim` reduces the
//! SDK's static archive to a keep-list of object members; `v5rt-strip`
//! wraps an external strip tool driven by an options file.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions for the four binaries
//! - [`digest`] - Streaming SHA-256 computation and digest validation
//! - [`download`] - SDK archive download over HTTPS
//! - [`error`] - Semantic error types mapped to exit codes at the boundary
//! - [`exec`] - Injected capability for running external tools
//! - [`extract`] - Zip extraction and keep-list resolution
//! - [`output`] - Progress reporting and exit-code conversion
//! - [`patch`] - Textual C header patching
//! - [`strip`] - External strip tool wrapper
//! - [`trim`] - Static archive trimming

pub mod cli;
pub mod digest;
pub mod download;
pub mod error;
pub mod exec;
pub mod extract;
pub mod output;
pub mod patch;
pub mod strip;
pub mod trim;

#[cfg(test)]
pub(crate) mod test_utils;
