//! SHA-256 checksum utilities
//!
//! Checksums use the canonical `sha256:<hex>` form and are recorded in the
//! export ledger for drift detection.

use sha2::{Digest, Sha256};

use crate::{Error, NormalizedPath, Result};

/// Prefix for all checksums produced by this module
const PREFIX: &str = "sha256:";

/// Checksum of in-memory bytes.
pub fn checksum_bytes(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Checksum of a file's current contents.
pub fn checksum_file(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    let content = std::fs::read(&native_path).map_err(|e| Error::io(&native_path, e))?;
    Ok(checksum_bytes(&content))
}
