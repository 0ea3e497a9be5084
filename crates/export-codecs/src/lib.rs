//! Output codecs for content-export
//!
//! A codec turns a structured payload into the text written to disk:
//!
//! - **FrontmatterCodec**: YAML front matter block followed by a document body
//! - **JsonCodec**: pretty-printed JSON
//! - **YamlCodec**: block-style YAML
//!
//! [`CodecRegistry`] maps a [`Format`] tag to its codec.

pub mod codecs;
pub mod error;
pub mod format;
pub mod registry;

pub use codecs::{FrontmatterCodec, JsonCodec, YamlCodec};
pub use error::{Error, Result};
pub use format::{Codec, Format};
pub use registry::CodecRegistry;
