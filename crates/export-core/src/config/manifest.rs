//! Manifest parsing for export.toml files

use export_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};

use super::DEFAULT_LEDGER;
use crate::rules::{Rule, RuleSet};
use crate::{Error, Result};

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_ledger() -> String {
    DEFAULT_LEDGER.to_string()
}

/// Core configuration section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreSection {
    /// Output directory, relative to the manifest
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Ledger file, relative to the output directory
    #[serde(default = "default_ledger")]
    pub ledger: String,
}

impl Default for CoreSection {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            ledger: default_ledger(),
        }
    }
}

/// Export configuration manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub core: CoreSection,

    /// Rules in evaluation order
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Manifest {
    /// Parse a manifest from TOML content
    ///
    /// # Example
    ///
    /// ```
    /// use export_core::config::Manifest;
    ///
    /// let manifest = Manifest::parse(r#"
    /// [core]
    /// output_dir = "site"
    ///
    /// [[rules]]
    /// kind = "data"
    /// format = "json"
    /// multiple = true
    /// [rules.match]
    /// model_name = "author"
    /// [rules.location]
    /// file_name = "_data/authors.json"
    /// "#).unwrap();
    ///
    /// assert_eq!(manifest.core.output_dir, "site");
    /// assert_eq!(manifest.rules.len(), 1);
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(content).map_err(|e| Error::InvalidManifest {
            message: e.to_string(),
        })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Load a manifest, picking the parser from the file extension.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ManifestNotFound {
                path: path.to_native(),
            });
        }

        let manifest: Self = ConfigStore::new().load(path).map_err(|e| match e {
            export_fs::Error::ConfigParse { message, .. } => Error::InvalidManifest { message },
            other => Error::Fs(other),
        })?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        if self.core.output_dir.trim().is_empty() {
            return Err(Error::InvalidManifest {
                message: "core.output_dir must not be empty".into(),
            });
        }
        if self.core.ledger.trim().is_empty() {
            return Err(Error::InvalidManifest {
                message: "core.ledger must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Output directory resolved against the directory holding the manifest.
    pub fn output_root(&self, manifest_dir: &NormalizedPath) -> NormalizedPath {
        let output = NormalizedPath::new(&self.core.output_dir);
        if output.is_absolute() {
            output.clean()
        } else {
            manifest_dir.join(output.as_str()).clean()
        }
    }

    /// Ledger location resolved against the output directory.
    pub fn ledger_path(&self, output_root: &NormalizedPath) -> NormalizedPath {
        let ledger = NormalizedPath::new(&self.core.ledger);
        if ledger.is_absolute() {
            ledger.clean()
        } else {
            output_root.join(ledger.as_str()).clean()
        }
    }

    /// The configured decision function, or `None` when there are no rules.
    pub fn rule_set(&self) -> Option<RuleSet> {
        (!self.rules.is_empty()).then(|| RuleSet::new(self.rules.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_manifest_uses_defaults() {
        let manifest = Manifest::parse("").unwrap();
        assert_eq!(manifest.core.output_dir, ".");
        assert_eq!(manifest.core.ledger, ".content-export/ledger.toml");
        assert!(manifest.rule_set().is_none());
    }

    #[test]
    fn paths_resolve_relative_to_manifest_and_output() {
        let manifest = Manifest::parse("[core]\noutput_dir = \"site\"\n").unwrap();
        let root = manifest.output_root(&NormalizedPath::new("/project"));
        assert_eq!(root.as_str(), "/project/site");
        assert_eq!(
            manifest.ledger_path(&root).as_str(),
            "/project/site/.content-export/ledger.toml"
        );
    }

    #[test]
    fn blank_output_dir_is_invalid() {
        assert!(matches!(
            Manifest::parse("[core]\noutput_dir = \"\"\n"),
            Err(Error::InvalidManifest { .. })
        ));
    }

    #[test]
    fn malformed_toml_is_invalid() {
        assert!(matches!(
            Manifest::parse("[[rules]]\nkind = \"video\"\n"),
            Err(Error::InvalidManifest { .. })
        ));
    }
}
