//! Per-object decisions
//!
//! A [`DecisionFunction`] looks at one [`Object`] and answers with a
//! [`Decision`]: write a file, skip the object, or reject it as invalid.
//! Closures and the rule interpreter ([`crate::rules::RuleSet`]) both
//! implement the trait.

use export_codecs::Format;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::object::Object;
use crate::{Error, Result, slug};

/// One desired file write produced for one object.
///
/// `path` and `format` are kept loose on purpose so that a decision can name
/// a tag the codec registry does not know, or leave the path out entirely.
/// Such specs are dropped by the reconciler as unwritable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteSpec {
    /// Path relative to the output directory
    #[serde(default)]
    pub path: Option<String>,
    /// Format tag, e.g. `json`
    pub format: String,
    /// Format-specific payload
    #[serde(default)]
    pub content: Value,
    /// Merge with earlier specs for the same path instead of replacing them
    #[serde(default)]
    pub append: bool,
}

impl WriteSpec {
    pub fn new(path: impl Into<String>, format: Format, content: Value) -> Self {
        Self {
            path: Some(path.into()),
            format: format.tag().to_string(),
            content,
            append: false,
        }
    }

    /// Mark this spec as appending to earlier specs for the same path.
    pub fn appending(mut self) -> Self {
        self.append = true;
        self
    }
}

/// Outcome of evaluating one object
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Write(WriteSpec),
    /// The object opted out of file writing
    Skip,
    /// The object could not be evaluated; the reason is logged
    Invalid(String),
}

impl Decision {
    pub fn invalid(reason: impl ToString) -> Self {
        Self::Invalid(reason.to_string())
    }
}

impl From<Result<Option<WriteSpec>>> for Decision {
    fn from(result: Result<Option<WriteSpec>>) -> Self {
        match result {
            Ok(Some(spec)) => Self::Write(spec),
            Ok(None) => Self::Skip,
            Err(e) => Self::invalid(e),
        }
    }
}

/// Helpers handed to every decision function invocation
#[derive(Debug, Clone, Copy, Default)]
pub struct Utils;

impl Utils {
    /// Slugify a field value.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] for missing, empty or non-string values.
    pub fn slugify(&self, value: &Value) -> Result<String> {
        slug::slugify_value(value)
    }

    /// Slugify an optional field value, treating absence as invalid input.
    pub fn slugify_field(&self, value: Option<&Value>) -> Result<String> {
        value
            .ok_or_else(|| Error::invalid_input("cannot slugify a missing value"))
            .and_then(|value| self.slugify(value))
    }
}

/// Maps one object to a [`Decision`]. Must not perform I/O.
pub trait DecisionFunction {
    fn decide(&self, object: &Object, utils: &Utils) -> Decision;
}

impl<F> DecisionFunction for F
where
    F: Fn(&Object, &Utils) -> Decision,
{
    fn decide(&self, object: &Object, utils: &Utils) -> Decision {
        self(object, utils)
    }
}
