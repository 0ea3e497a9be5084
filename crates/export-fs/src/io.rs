//! Atomic I/O operations with file locking

use std::fs::{self, OpenOptions};
use std::io::Write;

use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so readers never observe a partially
/// written file. Missing parent directories are created first.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Temp file lives in the same directory so the rename stays on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    let written = temp_file
        .write_all(content)
        .and_then(|()| temp_file.sync_all())
        .map_err(|e| Error::io(&temp_path, e));
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    if let Err(e) = fs::rename(&temp_path, &native_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(&native_path, e));
    }

    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Recursively create a directory and all of its parents.
pub fn create_dir_all(path: &NormalizedPath) -> Result<()> {
    let native_path = path.to_native();
    fs::create_dir_all(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Remove a single file. Directories are never removed.
pub fn remove_file(path: &NormalizedPath) -> Result<()> {
    let native_path = path.to_native();
    fs::remove_file(&native_path).map_err(|e| Error::io(&native_path, e))
}
