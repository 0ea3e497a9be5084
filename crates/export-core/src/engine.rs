//! ExportEngine implementation
//!
//! The engine owns the output directory. It loads the prior ledger, runs
//! the reconciler, and persists the new ledger once a run has completed.

use export_codecs::CodecRegistry;
use export_fs::NormalizedPath;
use export_fs::checksum::checksum_file;
use tracing::{debug, info, warn};

use crate::Result;
use crate::check::{CheckReport, DriftItem};
use crate::config::{DEFAULT_LEDGER, Manifest};
use crate::decision::DecisionFunction;
use crate::ledger::{Ledger, TrackedFile};
use crate::object::Object;
use crate::reconcile::{
    FileSystem, LocalFileSystem, PathResolver, Reconciler, RunOptions, RunReport,
};

/// Result of [`ExportEngine::transform`]
#[derive(Debug)]
pub struct TransformOutput {
    /// The input objects, unmodified
    pub objects: Vec<Object>,
    /// Present when a decision function was configured
    pub report: Option<RunReport>,
}

/// Engine for exporting objects into an output directory
pub struct ExportEngine {
    root: NormalizedPath,
    ledger_path: NormalizedPath,
    fs: Box<dyn FileSystem>,
    codecs: CodecRegistry,
}

impl ExportEngine {
    /// Engine writing below `root`, with the ledger at its default location.
    pub fn new(root: NormalizedPath) -> Self {
        let root = root.clean();
        let ledger_path = root.join(DEFAULT_LEDGER);
        Self {
            root,
            ledger_path,
            fs: Box::new(LocalFileSystem),
            codecs: CodecRegistry::new(),
        }
    }

    /// Engine configured from a manifest found in `manifest_dir`.
    pub fn from_manifest(manifest: &Manifest, manifest_dir: &NormalizedPath) -> Self {
        let root = manifest.output_root(manifest_dir);
        let ledger_path = manifest.ledger_path(&root);
        Self::new(root).with_ledger_path(ledger_path)
    }

    pub fn with_ledger_path(mut self, path: NormalizedPath) -> Self {
        self.ledger_path = path.clean();
        self
    }

    pub fn with_filesystem(mut self, fs: impl FileSystem + 'static) -> Self {
        self.fs = Box::new(fs);
        self
    }

    pub fn with_codecs(mut self, codecs: CodecRegistry) -> Self {
        self.codecs = codecs;
        self
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn ledger_path(&self) -> &NormalizedPath {
        &self.ledger_path
    }

    /// Load the ledger from disk, or an empty one on the first run.
    ///
    /// A ledger recorded for a different output directory owns nothing
    /// under this one and is replaced by an empty ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger file exists but cannot be read or parsed.
    pub fn load_ledger(&self) -> Result<Ledger> {
        let ledger = Ledger::load_or_default(&self.ledger_path)?;
        if ledger.belongs_to(&self.root) {
            return Ok(ledger);
        }

        warn!(
            ledger = %self.ledger_path.as_str(),
            recorded = %ledger.root().map(|root| root.as_str()).unwrap_or_default(),
            root = %self.root.as_str(),
            "Ledger belongs to another output directory, starting fresh"
        );
        Ok(Ledger::new())
    }

    /// Save the ledger to disk, creating its directory if needed.
    pub fn save_ledger(&self, ledger: &Ledger) -> Result<()> {
        ledger.save(&self.ledger_path)
    }

    /// Export `objects` and reconcile the output directory.
    ///
    /// Per-object and per-file failures end up in the report. Only a ledger
    /// that cannot be loaded or saved fails the run. Dry runs never save.
    pub fn run(
        &self,
        objects: &[Object],
        decide: &dyn DecisionFunction,
        options: RunOptions,
    ) -> Result<RunReport> {
        let prior = self.load_ledger()?;
        let resolver = PathResolver::new(&self.root).reserve(&self.ledger_path);
        let reconciler = Reconciler::new(self.fs.as_ref(), &self.codecs, resolver, options);

        let mut report = RunReport::new(options.dry_run);
        let next = reconciler.run(objects, decide, &prior, &mut report);

        if options.dry_run {
            debug!("Dry run, ledger not saved");
        } else {
            self.save_ledger(&next)?;
        }

        info!(
            objects = objects.len(),
            files = next.len(),
            created = report.created().count(),
            deleted = report.deleted().count(),
            failures = report.failures().count(),
            "Export finished"
        );
        Ok(report)
    }

    /// Pipeline entry point: hand the objects back unchanged, exporting them
    /// first when a decision function is configured.
    ///
    /// Without a decision function nothing is written and the ledger is not
    /// touched.
    pub fn transform(
        &self,
        objects: Vec<Object>,
        decide: Option<&dyn DecisionFunction>,
        options: RunOptions,
    ) -> Result<TransformOutput> {
        let report = match decide {
            Some(decide) => Some(self.run(&objects, decide, options)?),
            None => {
                debug!("No decision function configured, passing objects through");
                None
            }
        };
        Ok(TransformOutput { objects, report })
    }

    /// Files tracked by the current ledger
    pub fn tracked_files(&self) -> Result<Vec<TrackedFile>> {
        Ok(self.load_ledger()?.files().to_vec())
    }

    /// Compare the ledger with what is on disk.
    pub fn check(&self) -> CheckReport {
        let ledger = match self.load_ledger() {
            Ok(ledger) => ledger,
            Err(e) => return CheckReport::broken(format!("Failed to load ledger: {e}")),
        };

        let mut missing = Vec::new();
        let mut drifted = Vec::new();
        let mut messages = Vec::new();

        for tracked in ledger.files() {
            let absolute = self.root.join(tracked.path.as_str());
            let item = |description: String| DriftItem {
                path: tracked.path.as_str().to_string(),
                format: tracked.format.tag().to_string(),
                description,
            };

            if !absolute.is_file() {
                missing.push(item("File not found".to_string()));
                continue;
            }

            let Some(expected) = &tracked.checksum else {
                messages.push(format!(
                    "{}: no checksum recorded, last write failed",
                    tracked.path.as_str()
                ));
                continue;
            };

            match checksum_file(&absolute) {
                Ok(actual) if &actual == expected => {}
                Ok(actual) => drifted.push(item(format!(
                    "Checksum mismatch: expected {expected}, got {actual}"
                ))),
                Err(e) => missing.push(item(format!("Failed to read file: {e}"))),
            }
        }

        let report = CheckReport::from_findings(missing, drifted, messages);
        if !report.is_healthy() {
            debug!(status = ?report.status, "Output directory differs from ledger");
        }
        report
    }
}

impl std::fmt::Debug for ExportEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportEngine")
            .field("root", &self.root)
            .field("ledger_path", &self.ledger_path)
            .field("codecs", &self.codecs)
            .finish_non_exhaustive()
    }
}
