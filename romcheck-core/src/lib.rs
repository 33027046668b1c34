//! Verify a directory of ROM images against a DAT manifest.
//!
//! [`manifest::parse`] builds the lookup table, [`verify::VerificationEngine`]
//! scans and classifies, [`report::render`] turns the result into text.

pub mod error;
pub mod hash;
pub mod localize;
pub mod manifest;
pub mod progress;
pub mod report;
pub mod scan;
pub mod verify;

pub use error::{ManifestError, VerifyError};
pub use hash::{FileHasher, Sha256Hasher};
pub use manifest::{ManifestEntry, ManifestIndex};
pub use verify::{BadDump, ClassificationResult, FileError, VerificationEngine, VerifyOptions};
