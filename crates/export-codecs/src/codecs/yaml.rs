//! YAML codec using serde_yaml

use serde_json::Value;

use super::ensure_structured;
use crate::error::{Error, Result};
use crate::format::{Codec, Format};

/// Block-style YAML
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlCodec;

impl YamlCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for YamlCodec {
    fn format(&self) -> Format {
        Format::Yaml
    }

    fn serialize(&self, content: &Value) -> Result<String> {
        ensure_structured(Format::Yaml, content)?;
        serde_yaml::to_string(content).map_err(|e| Error::serialize(Format::Yaml, e))
    }
}
