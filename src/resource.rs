use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by the defaulting/validation pass.
///
/// A malformed specification must never reach the backend, so these are
/// always fatal to the enclosing test case.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("resource name must not be empty")]
    MissingName,

    #[error("unexpected kind '{actual}', expected '{expected}'")]
    WrongKind { expected: String, actual: String },

    #[error("at least one mapping is required")]
    NoMappings,

    #[error("mapping {mapping} must declare at least one match")]
    NoMatches { mapping: usize },

    #[error("mapping {mapping}, match {index}: exactly one of app_ids or group_ids must be set")]
    InvalidMatch { mapping: usize, index: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Metadata {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MatchPredicate {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub app_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Mapping {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub add_labels: BTreeMap<String, String>,

    #[serde(rename = "match", default, skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<MatchPredicate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ImportRuleSpec {
    #[serde(default)]
    pub priority: u32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mappings: Vec<Mapping>,
}

/// An Okta import rule: the resource whose lifecycle the verifier exercises.
///
/// Mirrors the backend's wire representation. The `kind` field is invariant
/// across updates and is defaulted by [`ImportRule::check_and_set_defaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ImportRule {
    #[serde(default)]
    pub kind: String,
    pub metadata: Metadata,
    #[serde(default)]
    pub spec: ImportRuleSpec,
}

impl ImportRule {
    pub const KIND: &'static str = "okta_import_rule";

    pub fn new(name: impl Into<String>, spec: ImportRuleSpec) -> Self {
        Self {
            kind: Self::KIND.to_string(),
            metadata: Metadata { name: name.into() },
            spec,
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Defaulting and validation pass, run before any backend write.
    ///
    /// Fills in an empty `kind` and rejects malformed specifications:
    /// missing name, wrong kind, zero mappings, a mapping without matches,
    /// or a match predicate that does not set exactly one ID list.
    pub fn check_and_set_defaults(&mut self) -> Result<(), ValidationError> {
        if self.kind.is_empty() {
            self.kind = Self::KIND.to_string();
        } else if self.kind != Self::KIND {
            return Err(ValidationError::WrongKind {
                expected: Self::KIND.to_string(),
                actual: self.kind.clone(),
            });
        }

        if self.metadata.name.is_empty() {
            return Err(ValidationError::MissingName);
        }

        if self.spec.mappings.is_empty() {
            return Err(ValidationError::NoMappings);
        }

        for (mapping_idx, mapping) in self.spec.mappings.iter().enumerate() {
            if mapping.matches.is_empty() {
                return Err(ValidationError::NoMatches {
                    mapping: mapping_idx,
                });
            }

            for (match_idx, predicate) in mapping.matches.iter().enumerate() {
                if predicate.app_ids.is_empty() == predicate.group_ids.is_empty() {
                    return Err(ValidationError::InvalidMatch {
                        mapping: mapping_idx,
                        index: match_idx,
                    });
                }
            }
        }

        Ok(())
    }

    /// Flattened attribute map in Terraform state style: list lengths under
    /// `#`, elements under their index. All state comparison goes through
    /// this representation.
    pub fn attributes(&self) -> BTreeMap<String, String> {
        let mut attrs = BTreeMap::new();
        attrs.insert("kind".to_string(), self.kind.clone());
        attrs.insert("metadata.name".to_string(), self.metadata.name.clone());
        attrs.insert("spec.priority".to_string(), self.spec.priority.to_string());
        attrs.insert(
            "spec.mappings.#".to_string(),
            self.spec.mappings.len().to_string(),
        );

        for (i, mapping) in self.spec.mappings.iter().enumerate() {
            for (key, value) in &mapping.add_labels {
                attrs.insert(format!("spec.mappings.{i}.add_labels.{key}"), value.clone());
            }

            attrs.insert(
                format!("spec.mappings.{i}.match.#"),
                mapping.matches.len().to_string(),
            );

            for (j, predicate) in mapping.matches.iter().enumerate() {
                let prefix = format!("spec.mappings.{i}.match.{j}");
                attrs.insert(
                    format!("{prefix}.app_ids.#"),
                    predicate.app_ids.len().to_string(),
                );
                for (k, id) in predicate.app_ids.iter().enumerate() {
                    attrs.insert(format!("{prefix}.app_ids.{k}"), id.clone());
                }
                attrs.insert(
                    format!("{prefix}.group_ids.#"),
                    predicate.group_ids.len().to_string(),
                );
                for (k, id) in predicate.group_ids.iter().enumerate() {
                    attrs.insert(format!("{prefix}.group_ids.{k}"), id.clone());
                }
            }
        }

        attrs
    }
}
