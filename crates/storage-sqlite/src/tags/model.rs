//! Database models for tag metadata.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use tagmill_core::tags::TagDefinition;

/// Database model for one taxonomy node
#[derive(Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct TagDefinitionDB {
    pub id: i64,
    pub name: String,
    pub industry: Option<String>,
    pub rule: Option<String>,
    pub business: Option<String>,
    pub level: i32,
    pub pid: Option<i64>,
    pub state: i32,
    pub remark: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<TagDefinitionDB> for TagDefinition {
    fn from(db: TagDefinitionDB) -> Self {
        TagDefinition {
            id: db.id,
            name: db.name,
            industry: db.industry,
            rule: db.rule,
            business_key: db.business,
            level: db.level,
            parent_id: db.pid,
            state: db.state,
            remark: db.remark,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
