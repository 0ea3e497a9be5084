//! Declarative rule set
//!
//! Rules are the persisted form of the export setup. Each rule pairs a
//! [`ModelMatch`] with a [`Mapping`]; the first rule whose match accepts an
//! object's metadata decides that object. Objects without metadata, or that
//! no rule matches, are skipped.

mod mapping;

pub use mapping::{
    DataFormat, DataLocation, DataMapping, Layout, Mapping, PageLocation, PageMapping,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decision::{Decision, DecisionFunction, Utils};
use crate::object::{Object, ObjectMetadata};

/// Metadata filter. Absent keys match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::object::string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_environment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ModelMatch {
    pub fn model(model_name: impl Into<String>) -> Self {
        Self {
            model_name: Some(model_name.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, meta: &ObjectMetadata) -> bool {
        let environment = meta
            .extra
            .get("projectEnvironment")
            .and_then(|value| value.as_str());

        accepts(&self.model_name, meta.model_name.as_deref())
            && accepts(&self.project_id, meta.project_id.as_deref())
            && accepts(&self.project_environment, environment)
            && accepts(&self.source, meta.source.as_deref())
    }
}

fn accepts(expected: &Option<String>, actual: Option<&str>) -> bool {
    expected.as_deref().is_none_or(|expected| actual == Some(expected))
}

/// One entry of the rule set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(rename = "match", default)]
    pub matcher: ModelMatch,
    #[serde(flatten)]
    pub mapping: Mapping,
}

impl Rule {
    pub fn new(matcher: ModelMatch, mapping: Mapping) -> Self {
        Self { matcher, mapping }
    }
}

/// Ordered rules, evaluated first-match-wins
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The first rule that accepts `object`, if any.
    pub fn find(&self, object: &Object) -> Option<&Rule> {
        let meta = object.metadata.as_ref()?;
        self.rules.iter().find(|rule| rule.matcher.matches(meta))
    }
}

impl DecisionFunction for RuleSet {
    fn decide(&self, object: &Object, utils: &Utils) -> Decision {
        match self.find(object) {
            Some(rule) => match rule.mapping.evaluate(object, utils) {
                Ok(spec) => Decision::Write(spec),
                Err(e) => Decision::invalid(e),
            },
            None => {
                debug!(object = %object.label(), "No rule matches");
                Decision::Skip
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use export_codecs::Format;
    use serde_json::json;

    fn data_rule(model: &str, file_name: &str) -> Rule {
        Rule::new(
            ModelMatch::model(model),
            Mapping::Data(DataMapping {
                format: DataFormat::Json,
                location: DataLocation::Fixed {
                    file_name: file_name.into(),
                },
                multiple: false,
            }),
        )
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = RuleSet::new(vec![
            data_rule("author", "_data/authors.json"),
            Rule::new(
                ModelMatch::default(),
                Mapping::Data(DataMapping {
                    format: DataFormat::Yaml,
                    location: DataLocation::Fixed {
                        file_name: "_data/rest.yaml".into(),
                    },
                    multiple: true,
                }),
            ),
            data_rule("author", "_data/never.json"),
        ]);

        let author = Object::new("author").with_field("name", "Ada");
        match rules.decide(&author, &Utils) {
            Decision::Write(spec) => {
                assert_eq!(spec.path.as_deref(), Some("_data/authors.json"));
                assert_eq!(spec.format, Format::Json.tag());
                assert_eq!(spec.content, json!({"name": "Ada"}));
                assert!(!spec.append);
            }
            other => panic!("unexpected {other:?}"),
        }

        let post = Object::new("post");
        match rules.decide(&post, &Utils) {
            Decision::Write(spec) => {
                assert_eq!(spec.path.as_deref(), Some("_data/rest.yaml"));
                assert!(spec.append);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn objects_without_metadata_never_match() {
        let rules = RuleSet::new(vec![Rule::new(
            ModelMatch::default(),
            data_rule("x", "x.json").mapping,
        )]);
        assert_eq!(rules.decide(&Object::bare(), &Utils), Decision::Skip);
    }

    #[test]
    fn match_checks_every_given_key() {
        let matcher = ModelMatch {
            model_name: Some("post".into()),
            project_id: Some("42".into()),
            project_environment: Some("production".into()),
            source: Some("cms".into()),
        };

        let mut meta = ObjectMetadata {
            model_name: Some("post".into()),
            project_id: Some("42".into()),
            source: Some("cms".into()),
            ..ObjectMetadata::default()
        };
        assert!(!matcher.matches(&meta));

        meta.extra
            .insert("projectEnvironment".into(), json!("production"));
        assert!(matcher.matches(&meta));

        meta.source = Some("other".into());
        assert!(!matcher.matches(&meta));
    }
}
