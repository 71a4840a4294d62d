//! SHA-256 checksums in the canonical `sha256:<hex>` form
//!
//! The sync state records the checksum of the artifact it last wrote so a
//! later run can tell whether the artifact was edited or replaced by hand.

use sha2::{Digest, Sha256};

const PREFIX: &str = "sha256:";

/// Checksum of raw bytes.
pub fn compute_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Checksum of string content.
pub fn compute_content_checksum(content: &str) -> String {
    compute_checksum(content.as_bytes())
}
