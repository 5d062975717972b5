//! Domain models for the tag taxonomy.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::{LEAF_TAG_LEVEL, MODEL_TAG_LEVEL};
use crate::errors::ConfigurationError;

/// A node in the five-level tag taxonomy.
///
/// Level-4 tags carry the source/classification rule text for one model;
/// level-5 tags are the classification leaves, each holding the literal
/// source-domain value it matches (e.g. a marital-status code).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagDefinition {
    pub id: i64,
    pub name: String,
    pub industry: Option<String>,
    pub rule: Option<String>,
    pub business_key: Option<String>,
    pub level: i32,
    pub parent_id: Option<i64>,
    pub state: i32,
    pub remark: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TagDefinition {
    pub fn is_model_tag(&self) -> bool {
        self.level == MODEL_TAG_LEVEL
    }

    pub fn is_leaf_tag(&self) -> bool {
        self.level == LEAF_TAG_LEVEL
    }
}

/// One loaded tag model: the level-4 definition plus its direct level-5
/// children, validated and ready for rule parsing.
#[derive(Debug, Clone)]
pub struct TagModel {
    pub model_tag: TagDefinition,
    pub leaves: Vec<TagDefinition>,
}

impl TagModel {
    /// Validates a metadata bundle loaded ordered by level ascending
    /// (the level-4 parent first, then its level-5 children).
    pub fn from_definitions(
        tag_id: i64,
        definitions: Vec<TagDefinition>,
    ) -> Result<Self, ConfigurationError> {
        let mut iter = definitions.into_iter();
        let model_tag = iter.next().ok_or(ConfigurationError::TagNotFound(tag_id))?;

        if !model_tag.is_model_tag() {
            return Err(ConfigurationError::NotAModelTag {
                tag_id: model_tag.id,
                level: model_tag.level,
            });
        }
        match model_tag.rule.as_deref() {
            Some(rule) if !rule.trim().is_empty() => {}
            _ => return Err(ConfigurationError::MissingRule(model_tag.id)),
        }

        let leaves: Vec<TagDefinition> = iter.filter(|t| t.is_leaf_tag()).collect();
        if leaves.is_empty() {
            return Err(ConfigurationError::NoChildren(model_tag.id));
        }

        Ok(TagModel { model_tag, leaves })
    }

    /// The rule text attached to the level-4 tag. Guaranteed non-empty by
    /// construction.
    pub fn rule_text(&self) -> &str {
        self.model_tag.rule.as_deref().unwrap_or_default()
    }
}
