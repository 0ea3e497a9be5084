//! Configuration files in any of the supported formats

use serde::de::DeserializeOwned;

use crate::{Error, NormalizedPath, Result, io};

/// Serialization format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    fn detect(path: &NormalizedPath) -> Result<Self> {
        let extension = path.extension().unwrap_or_default();
        match extension.to_ascii_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }

    fn deserialize<T: DeserializeOwned>(self, content: &str) -> std::result::Result<T, String> {
        match self {
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// Reads `.toml`, `.json`, `.yaml` and `.yml` files into any deserializable type.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Read and parse the file at `path`.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] when the file cannot be read, [`Error::UnsupportedFormat`]
    /// for other extensions and [`Error::ConfigParse`] for malformed content.
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let format = ConfigFormat::detect(path)?;
        let content = io::read_text(path)?;
        parse_as(format, path, &content)
    }

    /// Parse `content` as though it had been read from `path`.
    pub fn parse<T: DeserializeOwned>(&self, path: &NormalizedPath, content: &str) -> Result<T> {
        parse_as(ConfigFormat::detect(path)?, path, content)
    }
}

fn parse_as<T: DeserializeOwned>(
    format: ConfigFormat,
    path: &NormalizedPath,
    content: &str,
) -> Result<T> {
    format.deserialize(content).map_err(|message| Error::ConfigParse {
        path: path.to_native(),
        format: format.name().to_string(),
        message,
    })
}
