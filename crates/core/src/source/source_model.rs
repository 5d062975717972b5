//! Source row representation.

use std::collections::HashMap;

/// One record extracted from the source table: column name to value.
/// Nullable source columns map to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRow {
    columns: HashMap<String, Option<String>>,
}

impl SourceRow {
    pub fn new(columns: HashMap<String, Option<String>>) -> Self {
        SourceRow { columns }
    }

    /// The value of a column, flattening "column absent" and "column null"
    /// into `None`.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns.get(column).and_then(|v| v.as_deref())
    }
}

impl FromIterator<(String, Option<String>)> for SourceRow {
    fn from_iter<I: IntoIterator<Item = (String, Option<String>)>>(iter: I) -> Self {
        SourceRow {
            columns: iter.into_iter().collect(),
        }
    }
}
