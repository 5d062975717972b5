//! Database models for the wide-column store emulation.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// One row record: carries the version checked by conditional writes.
#[derive(Queryable, Selectable, Insertable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::wide_rows)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct WideRowDB {
    pub table_name: String,
    pub family: String,
    pub row_key: String,
    pub version: i64,
}

/// One cell: (row key, qualifier) to value.
#[derive(Queryable, Selectable, Insertable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::wide_cells)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct WideCellDB {
    pub table_name: String,
    pub family: String,
    pub row_key: String,
    pub qualifier: String,
    pub value: Option<String>,
}
