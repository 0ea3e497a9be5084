//! Format tags and the codec trait

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    /// Markdown-style document with a YAML front matter header
    FrontmatterDocument,
    Json,
    Yaml,
}

impl Format {
    /// All formats, in tag order
    pub const ALL: [Format; 3] = [Self::FrontmatterDocument, Self::Json, Self::Yaml];

    /// Parse a format tag. Tags are exact and case-sensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.tag() == tag)
    }

    /// The tag used in write specs and the ledger
    pub fn tag(&self) -> &'static str {
        match self {
            Self::FrontmatterDocument => "frontmatter-document",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    /// Conventional file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::FrontmatterDocument => "md",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for Format {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_tag(s).ok_or_else(|| crate::Error::UnknownFormat(s.to_string()))
    }
}

/// Trait for format-specific serializers.
///
/// `content` is either a single payload or, when several write specs were
/// appended to the same path, an array of payloads in submission order.
pub trait Codec: Send + Sync {
    /// Format this codec produces
    fn format(&self) -> Format;

    /// Serialize `content` into the exact text written to disk
    fn serialize(&self, content: &Value) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for format in Format::ALL {
            assert_eq!(Format::from_tag(format.tag()), Some(format));
        }
    }

    #[test]
    fn unknown_and_legacy_tags_are_rejected() {
        assert_eq!(Format::from_tag("frontmatter-md"), None);
        assert_eq!(Format::from_tag("yml"), None);
        assert_eq!(Format::from_tag("JSON"), None);
        assert!("toml".parse::<Format>().is_err());
    }

    #[test]
    fn serde_uses_tags() {
        let json = serde_json::to_string(&Format::FrontmatterDocument).unwrap();
        assert_eq!(json, "\"frontmatter-document\"");
        let parsed: Format = serde_json::from_str("\"yaml\"").unwrap();
        assert_eq!(parsed, Format::Yaml);
    }
}
