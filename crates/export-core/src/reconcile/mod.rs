//! File-set reconciliation
//!
//! A run has three stages:
//!
//! 1. **Plan**: every object goes through the decision function; accepted
//!    write specs are grouped by resolved path into a [`TargetState`].
//! 2. **Diff**: paths tracked by the prior ledger but absent from the target
//!    are stale.
//! 3. **Apply**: stale paths are deleted, then every planned file is
//!    written. Each path fails on its own without stopping the run.
//!
//! The returned [`Ledger`] lists every planned path, including the ones whose
//! write failed. Persisting it is left to the caller.

mod filesystem;
mod plan;
mod report;

pub use filesystem::{FileSystem, LocalFileSystem};
pub use plan::{PathResolver, Payload, PlannedFile, TargetState};
pub use report::{Reporter, RunEvent, RunReport};

use export_codecs::{CodecRegistry, Format};
use export_fs::NormalizedPath;
use export_fs::checksum::checksum_bytes;
use tracing::debug;

use crate::decision::{Decision, DecisionFunction, Utils, WriteSpec};
use crate::ledger::{Ledger, TrackedFile};
use crate::object::Object;
use crate::{Error, Result};

/// Options for export runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// If true, report changes without touching the filesystem.
    /// Events are `WouldCreate` / `WouldDelete` instead.
    pub dry_run: bool,
}

impl RunOptions {
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }
}

/// Reconciles one run's objects against the prior ledger
pub struct Reconciler<'a> {
    fs: &'a dyn FileSystem,
    codecs: &'a CodecRegistry,
    resolver: PathResolver,
    options: RunOptions,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        codecs: &'a CodecRegistry,
        resolver: PathResolver,
        options: RunOptions,
    ) -> Self {
        Self {
            fs,
            codecs,
            resolver,
            options,
        }
    }

    /// Run all three stages and return the ledger for the next run.
    pub fn run(
        &self,
        objects: &[Object],
        decide: &dyn DecisionFunction,
        prior: &Ledger,
        reporter: &mut dyn Reporter,
    ) -> Ledger {
        let target = self.plan(objects, decide, reporter);

        for path in stale_paths(prior, &target) {
            self.delete(path, reporter);
        }

        let files = target
            .files()
            .map(|planned| {
                let checksum = self.write(planned, reporter);
                TrackedFile::new(planned.path.clone(), planned.format, checksum)
            })
            .collect();

        Ledger::from_files(files).with_root(self.resolver.root())
    }

    /// Build the target state. Rejected objects are reported; skipped
    /// objects and unwritable specs are only logged at debug level.
    pub fn plan(
        &self,
        objects: &[Object],
        decide: &dyn DecisionFunction,
        reporter: &mut dyn Reporter,
    ) -> TargetState {
        let utils = Utils;
        let mut target = TargetState::new();

        for object in objects {
            match decide.decide(object, &utils) {
                Decision::Write(spec) => match self.accept(&spec) {
                    Ok((path, format)) => target.merge(path, format, spec.content, spec.append),
                    Err(e) => debug!(object = %object.label(), "Dropping write spec: {e}"),
                },
                Decision::Skip => debug!(object = %object.label(), "Skipped"),
                Decision::Invalid(reason) => reporter.record(RunEvent::ObjectFailed {
                    object: object.label(),
                    reason,
                }),
            }
        }

        target
    }

    /// Check that a spec names a path inside the root and a known format.
    fn accept(&self, spec: &WriteSpec) -> Result<(NormalizedPath, Format)> {
        let format = self
            .codecs
            .resolve(&spec.format)
            .ok_or_else(|| Error::unwritable(format!("unknown format `{}`", spec.format)))?;
        let path = self.resolver.resolve(spec.path.as_deref().unwrap_or_default())?;
        Ok((path, format))
    }

    fn delete(&self, path: &NormalizedPath, reporter: &mut dyn Reporter) {
        if self.options.dry_run {
            reporter.record(RunEvent::WouldDelete { path: path.clone() });
            return;
        }

        match self.delete_file(path) {
            Ok(()) => reporter.record(RunEvent::Deleted { path: path.clone() }),
            Err(e) => reporter.record(RunEvent::DeleteFailed {
                path: path.clone(),
                reason: e.to_string(),
            }),
        }
    }

    fn delete_file(&self, path: &NormalizedPath) -> Result<()> {
        self.fs
            .remove_file(&self.resolver.absolute(path))
            .map_err(|e| Error::DeleteFailed {
                path: path.as_str().to_string(),
                reason: e.to_string(),
            })
    }

    /// Write one planned file, returning its checksum on success.
    fn write(&self, planned: &PlannedFile, reporter: &mut dyn Reporter) -> Option<String> {
        if self.options.dry_run {
            reporter.record(RunEvent::WouldCreate {
                path: planned.path.clone(),
            });
            return None;
        }

        match self.write_file(planned) {
            Ok(checksum) => {
                reporter.record(RunEvent::Created {
                    path: planned.path.clone(),
                });
                Some(checksum)
            }
            Err(e) => {
                reporter.record(RunEvent::CreateFailed {
                    path: planned.path.clone(),
                    reason: e.to_string(),
                });
                None
            }
        }
    }

    fn write_file(&self, planned: &PlannedFile) -> Result<String> {
        let failed = |reason: String| Error::WriteFailed {
            path: planned.path.as_str().to_string(),
            reason,
        };
        let absolute = self.resolver.absolute(&planned.path);

        if let Some(parent) = absolute.parent() {
            self.fs
                .create_dir_all(&parent)
                .map_err(|e| failed(e.to_string()))?;
        }

        let text = self
            .codecs
            .serialize(planned.format, &planned.payload.to_value())
            .map_err(|e| failed(e.to_string()))?;

        self.fs
            .write(&absolute, text.as_bytes())
            .map_err(|e| failed(e.to_string()))?;

        Ok(checksum_bytes(text.as_bytes()))
    }
}

/// Paths tracked by `prior` that the target no longer produces, in ledger order.
pub fn stale_paths<'p>(prior: &'p Ledger, target: &TargetState) -> Vec<&'p NormalizedPath> {
    prior
        .paths()
        .filter(|path| !target.contains(path))
        .collect()
}
