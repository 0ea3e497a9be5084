//! Codec registry for selecting codecs by format tag

use std::collections::BTreeMap;

use serde_json::Value;

use crate::codecs::{FrontmatterCodec, JsonCodec, YamlCodec};
use crate::error::{Error, Result};
use crate::format::{Codec, Format};

/// Registry that maps format tags to codecs.
///
/// A write spec whose tag does not resolve through [`CodecRegistry::resolve`]
/// is not writable.
pub struct CodecRegistry {
    codecs: BTreeMap<Format, Box<dyn Codec>>,
}

impl CodecRegistry {
    /// Registry with every built-in codec.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(FrontmatterCodec::new());
        registry.register(JsonCodec::new());
        registry.register(YamlCodec::new());
        registry
    }

    /// Registry with no codecs at all.
    pub fn empty() -> Self {
        Self {
            codecs: BTreeMap::new(),
        }
    }

    /// Register a codec, replacing any codec previously registered for its format.
    pub fn register(&mut self, codec: impl Codec + 'static) {
        self.codecs.insert(codec.format(), Box::new(codec));
    }

    /// Resolve a tag to a format that has a registered codec.
    pub fn resolve(&self, tag: &str) -> Option<Format> {
        Format::from_tag(tag).filter(|format| self.codecs.contains_key(format))
    }

    /// Get the codec for a format.
    pub fn get(&self, format: Format) -> Option<&dyn Codec> {
        self.codecs.get(&format).map(|codec| codec.as_ref())
    }

    /// Serialize `content` with the codec registered for `format`.
    pub fn serialize(&self, format: Format, content: &Value) -> Result<String> {
        self.get(format)
            .ok_or(Error::NotRegistered(format))?
            .serialize(content)
    }

    /// Formats with a registered codec.
    pub fn formats(&self) -> impl Iterator<Item = Format> + '_ {
        self.codecs.keys().copied()
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("formats", &self.codecs.keys().collect::<Vec<_>>())
            .finish()
    }
}
