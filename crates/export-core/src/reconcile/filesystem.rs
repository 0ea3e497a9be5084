//! Filesystem adapter used by the apply stage

use export_fs::{NormalizedPath, io};

/// The three filesystem operations a run performs.
///
/// Paths are absolute. Implementations must not retry or swallow errors;
/// the reconciler decides what a failure means.
pub trait FileSystem {
    /// Recursively create a directory.
    fn create_dir_all(&self, path: &NormalizedPath) -> export_fs::Result<()>;

    /// Replace the file at `path` with `content`.
    fn write(&self, path: &NormalizedPath, content: &[u8]) -> export_fs::Result<()>;

    /// Remove a single file.
    fn remove_file(&self, path: &NormalizedPath) -> export_fs::Result<()>;
}

/// [`FileSystem`] backed by the local disk, writing atomically
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn create_dir_all(&self, path: &NormalizedPath) -> export_fs::Result<()> {
        io::create_dir_all(path)
    }

    fn write(&self, path: &NormalizedPath, content: &[u8]) -> export_fs::Result<()> {
        io::write_atomic(path, content)
    }

    fn remove_file(&self, path: &NormalizedPath) -> export_fs::Result<()> {
        io::remove_file(path)
    }
}
