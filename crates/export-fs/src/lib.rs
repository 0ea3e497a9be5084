//! Filesystem abstraction for content-export
//!
//! Provides normalized path handling, atomic writes, format-detecting
//! config loading and content checksums.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
