//! Front matter document codec
//!
//! Produces a YAML header fenced by `---` lines, followed by the trimmed
//! body and a single trailing newline.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::format::{Codec, Format};

const FENCE: &str = "---";

/// Codec for `{ body, frontmatter }` payloads
#[derive(Debug, Default, Clone, Copy)]
pub struct FrontmatterCodec;

impl FrontmatterCodec {
    pub fn new() -> Self {
        Self
    }

    fn body(payload: &Map<String, Value>) -> Result<&str> {
        match payload.get("body") {
            None | Some(Value::Null) => Ok(""),
            Some(Value::String(body)) => Ok(body),
            Some(_) => Err(Error::invalid(
                Format::FrontmatterDocument,
                "`body` must be a string",
            )),
        }
    }

    fn header(payload: &Map<String, Value>) -> Result<String> {
        let empty = Map::new();
        let frontmatter = match payload.get("frontmatter") {
            None | Some(Value::Null) => &empty,
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(Error::invalid(
                    Format::FrontmatterDocument,
                    "`frontmatter` must be a mapping",
                ));
            }
        };

        serde_yaml::to_string(frontmatter)
            .map_err(|e| Error::serialize(Format::FrontmatterDocument, e))
    }
}

impl Codec for FrontmatterCodec {
    fn format(&self) -> Format {
        Format::FrontmatterDocument
    }

    fn serialize(&self, content: &Value) -> Result<String> {
        let payload = match content {
            Value::Object(payload) => payload,
            Value::Array(_) => {
                return Err(Error::invalid(
                    Format::FrontmatterDocument,
                    "documents cannot be appended to one another",
                ));
            }
            _ => {
                return Err(Error::invalid(
                    Format::FrontmatterDocument,
                    "expected a mapping with `body` and `frontmatter`",
                ));
            }
        };

        let header = Self::header(payload)?;
        let body = Self::body(payload)?;

        Ok([FENCE, header.trim(), FENCE, body.trim(), ""].join("\n"))
    }
}
