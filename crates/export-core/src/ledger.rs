//! Ledger of files written by the previous run
//!
//! The ledger is the persisted prior file state. It lists every path the
//! last completed run intended to write, in target order, together with the
//! format and the checksum of what was written. Only paths in the ledger are
//! ever deleted by a later run.
//!
//! Entries are relative to the output directory recorded in `root`. A ledger
//! written for another root owns nothing under the current one.

use std::fs::{self, File, OpenOptions};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use export_codecs::Format;
use export_fs::NormalizedPath;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Error, Result};

const LEDGER_VERSION: &str = "1.0";

/// Distinguishes temp files of concurrent saves within one process
static SAVE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// One path tracked by the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedFile {
    /// Cleaned path relative to the output directory
    pub path: NormalizedPath,
    pub format: Format,
    /// `sha256:<hex>` of the written bytes; absent when the write failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl TrackedFile {
    pub fn new(path: NormalizedPath, format: Format, checksum: Option<String>) -> Self {
        Self {
            path,
            format,
            checksum,
        }
    }
}

/// The ledger tracks every file owned by the exporter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Ledger format version for forward compatibility
    version: String,
    /// Output directory the entries are relative to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    root: Option<NormalizedPath>,
    #[serde(default)]
    files: Vec<TrackedFile>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Create a new empty ledger
    pub fn new() -> Self {
        Self::from_files(Vec::new())
    }

    pub fn from_files(files: Vec<TrackedFile>) -> Self {
        Self {
            version: LEDGER_VERSION.to_string(),
            root: None,
            files,
        }
    }

    /// Record the output directory the entries belong to.
    pub fn with_root(mut self, root: &NormalizedPath) -> Self {
        self.root = Some(root.clean());
        self
    }

    pub fn root(&self) -> Option<&NormalizedPath> {
        self.root.as_ref()
    }

    /// Whether the entries are relative to `root`.
    ///
    /// Ledgers without a recorded root are assumed to belong to it.
    pub fn belongs_to(&self, root: &NormalizedPath) -> bool {
        self.root.as_ref().is_none_or(|own| *own == root.clean())
    }

    /// Load a ledger from a TOML file with shared lock
    ///
    /// An empty file loads as an empty ledger, with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, locked, or parsed, or if
    /// it was written by an incompatible version.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let native = path.to_native();
        let _lock = lock(path, LockMode::Shared)?;

        let mut content = String::new();
        File::open(&native)
            .and_then(|mut file| file.read_to_string(&mut content))
            .map_err(|e| export_fs::Error::io(&native, e))?;

        if content.trim().is_empty() {
            warn!(path = %path.as_str(), "Ledger file is empty, starting from an empty ledger");
            return Ok(Self::new());
        }

        let ledger: Ledger = toml::from_str(&content)?;
        if ledger.version != LEDGER_VERSION {
            return Err(ledger_error(
                path,
                format!("unsupported ledger version {}", ledger.version),
            ));
        }

        debug!(path = %path.as_str(), files = ledger.files.len(), "Loaded ledger");
        Ok(ledger)
    }

    /// Load the ledger, or start empty if it does not exist yet.
    pub fn load_or_default(path: &NormalizedPath) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    /// Save the ledger to a TOML file atomically with exclusive lock
    ///
    /// The parent directory is created when missing. The lock is held on a
    /// `.lock` file next to the ledger, so the ledger itself only ever
    /// changes by renaming a complete temp file over it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or locked.
    pub fn save(&self, path: &NormalizedPath) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        let native = path.to_native();

        if let Some(parent) = native.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| export_fs::Error::io(parent, e))?;
        }

        let _lock = lock(path, LockMode::Exclusive)?;

        let suffix = format!(
            "{}.{}.tmp",
            std::process::id(),
            SAVE_COUNTER.fetch_add(1, Ordering::Relaxed)
        );
        let temp_path = sibling(&native, &suffix);
        fs::write(&temp_path, &content).map_err(|e| export_fs::Error::io(&temp_path, e))?;
        if let Err(e) = fs::rename(&temp_path, &native) {
            let _ = fs::remove_file(&temp_path);
            return Err(export_fs::Error::io(&native, e).into());
        }

        debug!(path = %path.as_str(), files = self.files.len(), "Saved ledger");
        Ok(())
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Tracked files in target order
    pub fn files(&self) -> &[TrackedFile] {
        &self.files
    }

    pub fn paths(&self) -> impl Iterator<Item = &NormalizedPath> {
        self.files.iter().map(|file| &file.path)
    }

    pub fn contains(&self, path: &NormalizedPath) -> bool {
        self.get(path).is_some()
    }

    pub fn get(&self, path: &NormalizedPath) -> Option<&TrackedFile> {
        self.files.iter().find(|file| &file.path == path)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}

#[derive(Clone, Copy)]
enum LockMode {
    Shared,
    Exclusive,
}

/// Lock `<ledger>.lock`; released when the returned handle is dropped.
fn lock(path: &NormalizedPath, mode: LockMode) -> Result<File> {
    let lock_path = sibling(&path.to_native(), "lock");
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)
        .map_err(|e| export_fs::Error::io(&lock_path, e))?;

    let locked = match mode {
        LockMode::Shared => file.lock_shared(),
        LockMode::Exclusive => file.lock_exclusive(),
    };
    locked.map_err(|_| ledger_error(path, "could not acquire the ledger lock"))?;
    Ok(file)
}

/// `ledger.toml` -> `ledger.toml.<suffix>` in the same directory
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

fn ledger_error(path: &NormalizedPath, message: impl std::fmt::Display) -> Error {
    Error::LedgerError {
        message: format!("{}: {message}", path.as_str()),
    }
}
