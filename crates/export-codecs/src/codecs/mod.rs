//! Built-in codecs

mod frontmatter;
mod json;
mod yaml;

pub use frontmatter::FrontmatterCodec;
pub use json::JsonCodec;
pub use yaml::YamlCodec;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::format::Format;

/// Structured formats accept a mapping or a sequence of mappings.
fn ensure_structured(format: Format, content: &Value) -> Result<()> {
    match content {
        Value::Object(_) => Ok(()),
        Value::Array(items) => match items.iter().position(|item| !item.is_object()) {
            None => Ok(()),
            Some(index) => Err(Error::invalid(
                format,
                format!("item {index} of the sequence is not a mapping"),
            )),
        },
        _ => Err(Error::invalid(
            format,
            "expected a mapping or a sequence of mappings",
        )),
    }
}
