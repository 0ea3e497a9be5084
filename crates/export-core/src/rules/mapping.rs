//! Page and data mappings

use chrono::{DateTime, NaiveDate};
use export_codecs::Format;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::decision::{Utils, WriteSpec};
use crate::object::Object;
use crate::{Error, Result};

/// How matched objects are turned into files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mapping {
    /// One front matter document per object
    Page(PageMapping),
    /// Structured data file, optionally shared by several objects
    Data(DataMapping),
}

impl Mapping {
    pub fn evaluate(&self, object: &Object, utils: &Utils) -> Result<WriteSpec> {
        match self {
            Self::Page(page) => page.evaluate(object, utils),
            Self::Data(data) => data.evaluate(object),
        }
    }
}

/// Flat on-disk shape shared by page and data locations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    directory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_name_field: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    use_date: bool,
}

/// Where a page is written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLocation", into = "RawLocation")]
pub enum PageLocation {
    /// A single page at a fixed path
    Fixed { file_name: String },
    /// `<directory>/<date->?<slug>.md`, one page per object
    Collection {
        directory: Option<String>,
        file_name_field: String,
        use_date: bool,
    },
}

impl TryFrom<RawLocation> for PageLocation {
    type Error = String;

    fn try_from(raw: RawLocation) -> std::result::Result<Self, String> {
        match (raw.file_name, raw.file_name_field) {
            (Some(file_name), None) if raw.directory.is_none() && !raw.use_date => {
                Ok(Self::Fixed { file_name })
            }
            (Some(_), None) => {
                Err("`directory` and `use_date` only apply with `file_name_field`".into())
            }
            (None, Some(file_name_field)) => Ok(Self::Collection {
                directory: raw.directory,
                file_name_field,
                use_date: raw.use_date,
            }),
            (Some(_), Some(_)) => Err("set either `file_name` or `file_name_field`, not both".into()),
            (None, None) => Err("a page location needs `file_name` or `file_name_field`".into()),
        }
    }
}

impl From<PageLocation> for RawLocation {
    fn from(location: PageLocation) -> Self {
        match location {
            PageLocation::Fixed { file_name } => Self {
                file_name: Some(file_name),
                ..Self::default()
            },
            PageLocation::Collection {
                directory,
                file_name_field,
                use_date,
            } => Self {
                directory,
                file_name_field: Some(file_name_field),
                use_date,
                ..Self::default()
            },
        }
    }
}

/// Source of the front matter `layout` key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Layout {
    Static { value: String },
    Field { field: String },
}

/// Mapping for front matter documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMapping {
    pub location: PageLocation,
    /// Field whose value becomes the document body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
}

impl PageMapping {
    fn evaluate(&self, object: &Object, utils: &Utils) -> Result<WriteSpec> {
        let path = match &self.location {
            PageLocation::Fixed { file_name } => file_name.clone(),
            PageLocation::Collection {
                directory,
                file_name_field,
                use_date,
            } => {
                let slug = utils
                    .slugify_field(object.field(file_name_field))
                    .map_err(|e| {
                        Error::invalid_input(format!("field `{file_name_field}`: {e}"))
                    })?;

                let mut name = String::new();
                if *use_date {
                    let created_at = object
                        .metadata
                        .as_ref()
                        .and_then(|meta| meta.created_at.as_deref());
                    name.push_str(&date_prefix(created_at)?);
                    name.push('-');
                }
                name.push_str(&slug);
                name.push_str(".md");

                match directory.as_deref().map(|d| d.trim_end_matches('/')) {
                    Some(dir) if !dir.is_empty() => format!("{dir}/{name}"),
                    _ => name,
                }
            }
        };

        let mut frontmatter = object.fields.clone();
        let body = match &self.content_field {
            Some(field) => body_text(field, frontmatter.remove(field))?,
            None => String::new(),
        };

        match &self.layout {
            Some(Layout::Static { value }) => {
                frontmatter.insert("layout".into(), Value::String(value.clone()));
            }
            Some(Layout::Field { field }) => {
                if let Some(value) = object.field(field) {
                    frontmatter.insert("layout".into(), value.clone());
                }
            }
            None => {}
        }

        let mut content = Map::new();
        content.insert("body".into(), Value::String(body));
        content.insert("frontmatter".into(), Value::Object(frontmatter));

        Ok(WriteSpec::new(
            path,
            Format::FrontmatterDocument,
            Value::Object(content),
        ))
    }
}

/// Structured data formats a data mapping can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    Json,
    Yaml,
}

impl From<DataFormat> for Format {
    fn from(format: DataFormat) -> Self {
        match format {
            DataFormat::Json => Format::Json,
            DataFormat::Yaml => Format::Yaml,
        }
    }
}

/// Where a data file is written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLocation", into = "RawLocation")]
pub enum DataLocation {
    Fixed { file_name: String },
    /// The path is read verbatim from a field of the object
    Field { file_name_field: String },
}

impl TryFrom<RawLocation> for DataLocation {
    type Error = String;

    fn try_from(raw: RawLocation) -> std::result::Result<Self, String> {
        if raw.directory.is_some() || raw.use_date {
            return Err("`directory` and `use_date` only apply to page locations".into());
        }
        match (raw.file_name, raw.file_name_field) {
            (Some(file_name), None) => Ok(Self::Fixed { file_name }),
            (None, Some(file_name_field)) => Ok(Self::Field { file_name_field }),
            (Some(_), Some(_)) => Err("set either `file_name` or `file_name_field`, not both".into()),
            (None, None) => Err("a data location needs `file_name` or `file_name_field`".into()),
        }
    }
}

impl From<DataLocation> for RawLocation {
    fn from(location: DataLocation) -> Self {
        match location {
            DataLocation::Fixed { file_name } => Self {
                file_name: Some(file_name),
                ..Self::default()
            },
            DataLocation::Field { file_name_field } => Self {
                file_name_field: Some(file_name_field),
                ..Self::default()
            },
        }
    }
}

/// Mapping for JSON or YAML data files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataMapping {
    pub format: DataFormat,
    pub location: DataLocation,
    /// Collect every matching object into one sequence
    #[serde(default)]
    pub multiple: bool,
}

impl DataMapping {
    fn evaluate(&self, object: &Object) -> Result<WriteSpec> {
        let path = match &self.location {
            DataLocation::Fixed { file_name } => file_name.clone(),
            DataLocation::Field { file_name_field } => match object.field(file_name_field) {
                Some(Value::String(path)) if !path.trim().is_empty() => path.clone(),
                _ => {
                    return Err(Error::invalid_input(format!(
                        "field `{file_name_field}` does not hold a file location"
                    )));
                }
            },
        };

        let spec = WriteSpec::new(path, self.format.into(), Value::Object(object.fields.clone()));
        Ok(if self.multiple { spec.appending() } else { spec })
    }
}

/// `YYYY-MM-DD` taken from an object's creation timestamp.
fn date_prefix(created_at: Option<&str>) -> Result<String> {
    let created_at = created_at
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::invalid_input("object has no createdAt to date the file name"))?;

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(created_at) {
        return Ok(timestamp.format("%Y-%m-%d").to_string());
    }

    created_at
        .get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or_else(|| Error::invalid_input(format!("createdAt {created_at:?} is not a date")))
}

fn body_text(field: &str, value: Option<Value>) -> Result<String> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(body)) => Ok(body),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(_) => Err(Error::invalid_input(format!(
            "content field `{field}` is not text"
        ))),
    }
}
