//! Export configuration
//!
//! The manifest (`export.toml` by default) names the output directory, the
//! ledger location and the rule set. JSON and YAML manifests are accepted
//! by extension.

mod manifest;

pub use manifest::{CoreSection, Manifest};

/// Manifest file name looked up when none is given
pub const DEFAULT_MANIFEST: &str = "export.toml";

/// Ledger location relative to the output directory
pub const DEFAULT_LEDGER: &str = ".content-export/ledger.toml";
