//! JSON codec

use serde_json::Value;

use super::ensure_structured;
use crate::error::{Error, Result};
use crate::format::{Codec, Format};

/// Pretty-printed JSON with two-space indentation
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for JsonCodec {
    fn format(&self) -> Format {
        Format::Json
    }

    fn serialize(&self, content: &Value) -> Result<String> {
        ensure_structured(Format::Json, content)?;
        serde_json::to_string_pretty(content).map_err(|e| Error::serialize(Format::Json, e))
    }
}
