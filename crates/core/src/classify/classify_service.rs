//! Row classification.
//!
//! Both modes are pure transforms over the source row sequence: no store
//! access, no shared state, so partitions of the source can be classified
//! in parallel by whatever engine runs the extraction. Unmatched rows are
//! classification outcomes, not errors; they are dropped with a debug log.

use std::collections::HashMap;

use log::debug;

use crate::rules::RuleSet;
use crate::source::SourceRow;

use super::{ClassifiedPair, ClassifyMode};

/// Classify one row, or drop it.
///
/// Rows with a missing user id, a null classification value, or a value no
/// rule matches produce nothing.
fn classify_row(
    row: &SourceRow,
    rules: &RuleSet,
    user_column: &str,
    classify_column: &str,
) -> Option<ClassifiedPair> {
    let user_id = row.get(user_column)?;
    if user_id.is_empty() {
        return None;
    }
    let value = match row.get(classify_column) {
        Some(v) => v,
        None => {
            debug!("row for user {} has no '{}' value", user_id, classify_column);
            return None;
        }
    };
    match rules.classify(value) {
        Some(tag_id) => Some(ClassifiedPair {
            user_id: user_id.to_string(),
            tag_id,
        }),
        None => {
            debug!("value '{}' for user {} matched no rule", value, user_id);
            None
        }
    }
}

/// Direct mode: each row yields at most one pair, lazily.
pub fn classify_direct<'a>(
    rows: impl Iterator<Item = SourceRow> + 'a,
    rules: &'a RuleSet,
    user_column: &'a str,
    classify_column: &'a str,
) -> impl Iterator<Item = ClassifiedPair> + 'a {
    rows.filter_map(move |row| classify_row(&row, rules, user_column, classify_column))
}

/// Aggregated mode: classify every row, then keep the dominant tag per user.
///
/// Ties break to the first tag encountered for that user, and users whose
/// rows match no rule at all are dropped. Output order follows first
/// appearance of each user, so a fixed input sequence gives a fixed output
/// sequence.
pub fn classify_aggregated(
    rows: impl Iterator<Item = SourceRow>,
    rules: &RuleSet,
    user_column: &str,
    classify_column: &str,
) -> Vec<ClassifiedPair> {
    let mut user_order: Vec<String> = Vec::new();
    // user -> (tag, occurrences), in first-seen tag order
    let mut counts: HashMap<String, Vec<(i64, u64)>> = HashMap::new();

    for pair in rows.filter_map(|row| classify_row(&row, rules, user_column, classify_column)) {
        if !counts.contains_key(&pair.user_id) {
            user_order.push(pair.user_id.clone());
        }
        let tags = counts.entry(pair.user_id.clone()).or_default();
        match tags.iter_mut().find(|(tag, _)| *tag == pair.tag_id) {
            Some((_, count)) => *count += 1,
            None => tags.push((pair.tag_id, 1)),
        }
    }

    user_order
        .into_iter()
        .filter_map(|user_id| {
            let tags = counts.remove(&user_id)?;
            let (tag_id, _) = tags
                .into_iter()
                .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })?;
            Some(ClassifiedPair { user_id, tag_id })
        })
        .collect()
}

/// Run the mode the model's configuration asks for.
pub fn classify(
    mode: ClassifyMode,
    rows: impl Iterator<Item = SourceRow>,
    rules: &RuleSet,
    user_column: &str,
    classify_column: &str,
) -> Vec<ClassifiedPair> {
    match mode {
        ClassifyMode::Direct => rows
            .filter_map(|row| classify_row(&row, rules, user_column, classify_column))
            .collect(),
        ClassifyMode::Aggregated => {
            classify_aggregated(rows, rules, user_column, classify_column)
        }
    }
}
