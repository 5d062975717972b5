//! Repository implementation for tag metadata lookup.

use std::sync::Arc;

use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;

use tagmill_core::tags::{TagDefinition, TagMetadataRepositoryTrait};
use tagmill_core::Result;

use super::model::TagDefinitionDB;
use crate::db::get_connection;
use crate::errors::IntoCore;
use crate::schema::tags;

pub struct TagMetadataRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl TagMetadataRepository {
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }
}

impl TagMetadataRepositoryTrait for TagMetadataRepository {
    fn load_model(&self, tag_id: i64) -> Result<Vec<TagDefinition>> {
        let mut conn = get_connection(&self.pool)?;
        // Level-ascending order puts the level-4 parent first, the way the
        // driver expects the bundle.
        let results = tags::table
            .filter(tags::id.eq(tag_id).or(tags::pid.eq(tag_id)))
            .order(tags::level.asc())
            .load::<TagDefinitionDB>(&mut conn)
            .into_core()?;
        Ok(results.into_iter().map(TagDefinition::from).collect())
    }
}
