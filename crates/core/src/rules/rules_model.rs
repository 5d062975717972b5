//! Parsed rule descriptors and classification rule sets.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigurationError;
use crate::tags::TagDefinition;

/// Kind of source a level-4 rule points at. Only the wide-column kind is
/// implemented; the parser rejects everything else explicitly so a
/// mis-parsed descriptor cannot turn into a silent empty write downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    WideColumn,
}

/// Equality predicate pushed down to the source reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPredicate {
    pub column: String,
    pub value: String,
}

/// Parsed result of a level-4 rule: where the source rows live and which
/// columns the model needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDescriptor {
    pub kind: SourceKind,
    pub table: String,
    pub family: String,
    pub select_columns: Vec<String>,
    pub filters: Vec<FilterPredicate>,
}

impl SourceDescriptor {
    /// First select column: the user identity.
    pub fn user_id_column(&self) -> Option<&str> {
        self.select_columns.first().map(String::as_str)
    }

    /// Second select column: the value the rules classify on.
    pub fn classify_column(&self) -> Option<&str> {
        self.select_columns.get(1).map(String::as_str)
    }
}

/// One (tag id, match value) pair derived from a level-5 leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationRule {
    pub tag_id: i64,
    pub match_value: String,
}

/// The classification rules of one model, indexed by match value.
///
/// Match values are unique by construction: duplicates fail fast here
/// instead of letting an arbitrary rule win at classification time.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<ClassificationRule>,
    by_value: HashMap<String, i64>,
}

impl RuleSet {
    pub fn from_leaves(leaves: &[TagDefinition]) -> Result<Self, ConfigurationError> {
        let mut rules = Vec::with_capacity(leaves.len());
        let mut by_value: HashMap<String, i64> = HashMap::with_capacity(leaves.len());

        for leaf in leaves {
            let value = leaf
                .rule
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigurationError::EmptyMatchValue(leaf.id))?;

            if let Some(&first) = by_value.get(value) {
                return Err(ConfigurationError::DuplicateMatchValue {
                    value: value.to_string(),
                    first,
                    second: leaf.id,
                });
            }

            by_value.insert(value.to_string(), leaf.id);
            rules.push(ClassificationRule {
                tag_id: leaf.id,
                match_value: value.to_string(),
            });
        }

        Ok(RuleSet { rules, by_value })
    }

    /// Exact-match lookup of a source value. `None` means the row stays
    /// unclassified.
    pub fn classify(&self, value: &str) -> Option<i64> {
        self.by_value.get(value).copied()
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
