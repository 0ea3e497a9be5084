//! Target file state
//!
//! The target state is rebuilt on every run from the accepted write specs,
//! keyed by cleaned path in the order paths were first produced.

use export_codecs::Format;
use export_fs::NormalizedPath;
use indexmap::IndexMap;
use serde_json::Value;

use crate::{Error, Result};

/// Content planned for one path
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Single(Value),
    /// Appended payloads in submission order
    Sequence(Vec<Value>),
}

impl Payload {
    /// Append `content`, turning a single payload into a sequence first.
    pub fn push(&mut self, content: Value) {
        match self {
            Self::Sequence(items) => items.push(content),
            Self::Single(first) => {
                let first = std::mem::take(first);
                *self = Self::Sequence(vec![first, content]);
            }
        }
    }

    /// The value handed to the codec
    pub fn to_value(&self) -> Value {
        match self {
            Self::Single(value) => value.clone(),
            Self::Sequence(items) => Value::Array(items.clone()),
        }
    }
}

/// One file of the target state
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedFile {
    pub path: NormalizedPath,
    pub format: Format,
    pub payload: Payload,
}

/// Desired file set of the current run
#[derive(Debug, Clone, Default)]
pub struct TargetState {
    files: IndexMap<NormalizedPath, PlannedFile>,
}

impl TargetState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one accepted spec into the target.
    ///
    /// An appending spec extends whatever is already planned for the path and
    /// keeps its format. Any other spec replaces the planned file outright.
    pub fn merge(&mut self, path: NormalizedPath, format: Format, content: Value, append: bool) {
        match self.files.get_mut(&path) {
            Some(existing) if append => existing.payload.push(content),
            Some(existing) => {
                existing.format = format;
                existing.payload = Payload::Single(content);
            }
            None => {
                let planned = PlannedFile {
                    path: path.clone(),
                    format,
                    payload: Payload::Single(content),
                };
                self.files.insert(path, planned);
            }
        }
    }

    pub fn contains(&self, path: &NormalizedPath) -> bool {
        self.files.contains_key(path)
    }

    pub fn get(&self, path: &NormalizedPath) -> Option<&PlannedFile> {
        self.files.get(path)
    }

    pub fn files(&self) -> impl Iterator<Item = &PlannedFile> {
        self.files.values()
    }

    pub fn paths(&self) -> impl Iterator<Item = &NormalizedPath> {
        self.files.keys()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Confines write spec paths to the output directory.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: NormalizedPath,
    reserved: Vec<NormalizedPath>,
}

impl PathResolver {
    /// `root` should be absolute; it is cleaned here.
    pub fn new(root: &NormalizedPath) -> Self {
        Self {
            root: root.clean(),
            reserved: Vec::new(),
        }
    }

    /// Refuse to hand out `path` (absolute or relative to the root).
    pub fn reserve(mut self, path: &NormalizedPath) -> Self {
        if let Ok(relative) = self.resolve(path.as_str()) {
            self.reserved.push(relative);
        }
        self
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Resolve a spec path to a cleaned path relative to the root.
    ///
    /// # Errors
    ///
    /// [`Error::UnwritableSpec`] for blank paths, paths that leave the root
    /// or name the root itself, and reserved paths.
    pub fn resolve(&self, raw: &str) -> Result<NormalizedPath> {
        if raw.trim().is_empty() {
            return Err(Error::unwritable("missing path"));
        }

        let outside = || Error::unwritable(format!("{raw} is outside the output directory"));

        let candidate = NormalizedPath::new(raw);
        let relative = if candidate.is_absolute() {
            let absolute = candidate.clean();
            NormalizedPath::new(absolute.strip_prefix(&self.root).ok_or_else(outside)?)
        } else {
            candidate.clean()
        };

        match relative.as_str() {
            "" | "." => {
                return Err(Error::unwritable(format!(
                    "{raw} names the output directory"
                )));
            }
            ".." => return Err(outside()),
            rest if rest.starts_with("../") => return Err(outside()),
            _ => {}
        }

        if self.reserved.contains(&relative) {
            return Err(Error::unwritable(format!("{raw} is reserved for the ledger")));
        }
        Ok(relative)
    }

    /// Absolute location of a resolved path.
    pub fn absolute(&self, relative: &NormalizedPath) -> NormalizedPath {
        self.root.join(relative.as_str())
    }
}
