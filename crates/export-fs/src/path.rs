//! Slash-separated paths
//!
//! Output files are identified by path, so every path in this workspace is
//! held as a [`NormalizedPath`]: forward slashes only, converted back to a
//! native [`PathBuf`] right before touching the disk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Path stored with `/` separators on every platform.
///
/// Equality is textual. Two spellings of one location compare equal only
/// after [`NormalizedPath::clean`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Backslashes in `path` become `/`. Nothing else is rewritten.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            inner: path.as_ref().to_string_lossy().replace('\\', "/"),
        }
    }

    /// Absolute, symlink-free form of an existing path.
    ///
    /// `dunce` keeps Windows results free of the `\\?\` verbatim prefix.
    pub fn canonicalize(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        dunce::canonicalize(path)
            .map(Self::new)
            .map_err(|e| Error::io(path, e))
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Native form for `std::fs` calls.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Append `segment` with exactly one separator in between. The result is
    /// not cleaned.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        let inner = match self.inner.as_str() {
            "" => segment,
            base if base.ends_with('/') => format!("{base}{segment}"),
            base => format!("{base}/{segment}"),
        };
        Self { inner }
    }

    /// Lexically resolve `.` and `..` segments and collapse repeated slashes.
    ///
    /// No filesystem access. `..` never climbs above the root of an
    /// absolute path; leading `..` segments of a relative path are kept.
    pub fn clean(&self) -> Self {
        let (root, rest) = if self.is_network_path() && self.inner.starts_with("//") {
            ("//", &self.inner[2..])
        } else if self.inner.starts_with('/') {
            ("/", &self.inner[1..])
        } else {
            ("", self.inner.as_str())
        };

        let mut parts: Vec<&str> = Vec::new();
        for part in rest.split('/') {
            match part {
                "" | "." => {}
                ".." => match parts.last() {
                    Some(last) if *last != ".." => {
                        parts.pop();
                    }
                    _ if !root.is_empty() => {}
                    _ => parts.push(".."),
                },
                other => parts.push(other),
            }
        }

        let joined = parts.join("/");
        let inner = match (root, joined.is_empty()) {
            ("", true) => ".".to_string(),
            (root, _) => format!("{}{}", root, joined),
        };
        Self { inner }
    }

    /// Whether this path is rooted (`/…`, `//server/…` or a drive letter).
    pub fn is_absolute(&self) -> bool {
        let bytes = self.inner.as_bytes();
        self.inner.starts_with('/')
            || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
    }

    /// Component-wise prefix test.
    ///
    /// `/out/posts` starts with `/out` but not with `/ou`.
    pub fn starts_with(&self, base: &NormalizedPath) -> bool {
        self.strip_prefix(base).is_some()
    }

    /// The remainder of this path below `base`, without a leading slash.
    ///
    /// Returns `Some("")` when both paths are equal.
    pub fn strip_prefix(&self, base: &NormalizedPath) -> Option<&str> {
        let base = base.inner.trim_end_matches('/');
        let rest = self.inner.strip_prefix(base)?;
        if rest.is_empty() {
            Some(rest)
        } else if base.is_empty() {
            Some(rest.trim_start_matches('/'))
        } else {
            rest.strip_prefix('/')
        }
    }

    /// Everything before the last component; `None` for a bare name or `/`.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        let inner = match trimmed.rfind('/')? {
            0 if trimmed.len() > 1 => "/".to_string(),
            0 => return None,
            idx => trimmed[..idx].to_string(),
        };
        Some(Self { inner })
    }

    /// Last component, ignoring trailing slashes.
    pub fn file_name(&self) -> Option<&str> {
        self.inner
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
    }

    /// Extension of [`file_name`](Self::file_name). Dotfiles have none.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        }
    }

    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// `//server/share` style UNC path
    fn is_network_path(&self) -> bool {
        self.inner.starts_with("//") && !self.inner.starts_with("///")
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<NormalizedPath> for String {
    fn from(path: NormalizedPath) -> Self {
        path.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_resolves_dot_segments() {
        assert_eq!(NormalizedPath::new("/out/./a/../b").clean().as_str(), "/out/b");
    }

    #[test]
    fn clean_does_not_climb_above_root() {
        assert_eq!(NormalizedPath::new("/../../etc").clean().as_str(), "/etc");
    }

    #[test]
    fn clean_keeps_leading_parent_segments_of_relative_paths() {
        assert_eq!(NormalizedPath::new("../a/../../b").clean().as_str(), "../../b");
    }

    #[test]
    fn clean_of_empty_relative_is_dot() {
        assert_eq!(NormalizedPath::new("a/..").clean().as_str(), ".");
    }

    #[test]
    fn strip_prefix_is_component_wise() {
        let base = NormalizedPath::new("/out");
        assert_eq!(
            NormalizedPath::new("/out/posts/a.md").strip_prefix(&base),
            Some("posts/a.md")
        );
        assert_eq!(NormalizedPath::new("/outside/a.md").strip_prefix(&base), None);
        assert_eq!(NormalizedPath::new("/out").strip_prefix(&base), Some(""));
    }
}
