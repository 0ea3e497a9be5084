//! Content objects as delivered by the content source
//!
//! An object carries a reserved `__metadata` record and an open set of
//! content fields. Objects are read-only for the duration of a run.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Reserved metadata attached to every object by the content source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    /// Creation timestamp, usually RFC 3339
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Name of the content model that owns the object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub project_id: Option<String>,
    /// Name of the content source (e.g. a CMS connector)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Metadata keys this crate does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One record from the content source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Object {
    #[serde(
        rename = "__metadata",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub metadata: Option<ObjectMetadata>,
    /// Content fields, everything except `__metadata`
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Object {
    /// Object of the given model with no fields.
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            metadata: Some(ObjectMetadata {
                model_name: Some(model_name.into()),
                ..ObjectMetadata::default()
            }),
            fields: Map::new(),
        }
    }

    /// Object without any metadata
    pub fn bare() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.metadata.get_or_insert_with(ObjectMetadata::default).id = Some(id.into());
        self
    }

    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(ObjectMetadata::default)
            .created_at = Some(created_at.into());
        self
    }

    pub fn with_project(mut self, project_id: impl Into<String>, source: impl Into<String>) -> Self {
        let metadata = self.metadata.get_or_insert_with(ObjectMetadata::default);
        metadata.project_id = Some(project_id.into());
        metadata.source = Some(source.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn model_name(&self) -> Option<&str> {
        self.metadata.as_ref()?.model_name.as_deref()
    }

    /// Short human-readable label used in log lines, e.g. `post#1`.
    pub fn label(&self) -> String {
        let model = self.model_name().unwrap_or("object");
        match self.metadata.as_ref().and_then(|m| m.id.as_ref()) {
            Some(Value::String(id)) => format!("{model}#{id}"),
            Some(id) => format!("{model}#{id}"),
            None => model.to_string(),
        }
    }
}

/// Content sources are inconsistent about numeric vs string project ids.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}
