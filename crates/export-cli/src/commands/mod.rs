//! Command implementations for export-cli

pub mod check;
pub mod run;
pub mod status;

pub use check::run_check;
pub use run::run_export;
pub use status::run_status;

use std::path::Path;

use export_core::{ExportEngine, Manifest};
use export_fs::NormalizedPath;

/// A loaded manifest and the engine for its output directory
pub struct Project {
    pub manifest: Manifest,
    pub engine: ExportEngine,
}

impl Project {
    /// Load the manifest at `config`. Relative output paths are resolved
    /// against the manifest's directory.
    pub fn load(config: &Path) -> crate::error::Result<Self> {
        let manifest = Manifest::load(&NormalizedPath::new(config))?;
        let manifest_path = NormalizedPath::canonicalize(config)?;
        let manifest_dir = manifest_path
            .parent()
            .unwrap_or_else(|| NormalizedPath::new("."));

        let engine = ExportEngine::from_manifest(&manifest, &manifest_dir);
        tracing::debug!(root = %engine.root().as_str(), ledger = %engine.ledger_path().as_str(), "Loaded manifest");

        Ok(Self { manifest, engine })
    }
}
