//! Parser for level-4 rule text.
//!
//! Rule text is a `##`-separated list of `key=value` pairs, e.g.
//!
//! ```text
//! inType=hbase##hbaseTable=tbl_orders##family=detail##selectFieldNames=memberId,paymentCode
//! ```
//!
//! Keys the engine does not consume (connection endpoints and the like, which
//! belong to the extraction engine's own configuration) are ignored.

use std::collections::HashMap;

use super::{FilterPredicate, SourceDescriptor, SourceKind};
use crate::errors::RuleError;

const KEY_IN_TYPE: &str = "inType";
const KEY_TABLE: &str = "hbaseTable";
const KEY_FAMILY: &str = "family";
const KEY_SELECT: &str = "selectFieldNames";
const KEY_WHERE: &str = "whereFieldNames";

const PAIR_SEPARATOR: &str = "##";
const LIST_SEPARATOR: char = ',';

/// Parse a level-4 rule into a source descriptor.
///
/// Fails on empty text, a segment that is not `key=value`, an unsupported
/// source kind, or missing table/family/select columns.
pub fn parse_rule(text: &str) -> Result<SourceDescriptor, RuleError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(RuleError::Empty);
    }

    let mut pairs: HashMap<&str, &str> = HashMap::new();
    for segment in text.split(PAIR_SEPARATOR) {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let (key, value) = segment
            .split_once('=')
            .ok_or_else(|| RuleError::Malformed(segment.to_string()))?;
        pairs.insert(key.trim(), value.trim());
    }

    let kind = match pairs.get(KEY_IN_TYPE) {
        None => return Err(RuleError::MissingKey(KEY_IN_TYPE)),
        Some(raw) if raw.eq_ignore_ascii_case("hbase") => SourceKind::WideColumn,
        Some(raw) => return Err(RuleError::UnsupportedSourceKind(raw.to_string())),
    };

    let table = require(&pairs, KEY_TABLE)?;
    let family = require(&pairs, KEY_FAMILY)?;

    let select_columns: Vec<String> = require(&pairs, KEY_SELECT)?
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    if select_columns.is_empty() {
        return Err(RuleError::MissingKey(KEY_SELECT));
    }

    let filters = match pairs.get(KEY_WHERE).copied().filter(|w| !w.is_empty()) {
        None => Vec::new(),
        Some(raw) => parse_filters(raw)?,
    };

    Ok(SourceDescriptor {
        kind,
        table: table.to_string(),
        family: family.to_string(),
        select_columns,
        filters,
    })
}

fn require<'a>(
    pairs: &HashMap<&str, &'a str>,
    key: &'static str,
) -> Result<&'a str, RuleError> {
    pairs
        .get(key)
        .copied()
        .filter(|v| !v.is_empty())
        .ok_or(RuleError::MissingKey(key))
}

fn parse_filters(raw: &str) -> Result<Vec<FilterPredicate>, RuleError> {
    raw.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(|f| {
            let (column, value) = f
                .split_once('=')
                .ok_or_else(|| RuleError::InvalidFilter(f.to_string()))?;
            let column = column.trim();
            if column.is_empty() {
                return Err(RuleError::InvalidFilter(f.to_string()));
            }
            Ok(FilterPredicate {
                column: column.to_string(),
                value: value.trim().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_rule() {
        let rule = "inType=hbase##zkHosts=192.168.10.20##zkPort=2181\
                    ##hbaseTable=tbl_users##family=detail\
                    ##selectFieldNames=id,marriage";
        let descriptor = parse_rule(rule).unwrap();
        assert_eq!(descriptor.kind, SourceKind::WideColumn);
        assert_eq!(descriptor.table, "tbl_users");
        assert_eq!(descriptor.family, "detail");
        assert_eq!(descriptor.select_columns, vec!["id", "marriage"]);
        assert!(descriptor.filters.is_empty());
        assert_eq!(descriptor.user_id_column(), Some("id"));
        assert_eq!(descriptor.classify_column(), Some("marriage"));
    }

    #[test]
    fn parses_where_fields_into_filters() {
        let rule = "inType=HBase##hbaseTable=tbl_orders##family=detail\
                    ##selectFieldNames=memberId,paymentCode\
                    ##whereFieldNames=state=1,channel=app";
        let descriptor = parse_rule(rule).unwrap();
        assert_eq!(
            descriptor.filters,
            vec![
                FilterPredicate {
                    column: "state".to_string(),
                    value: "1".to_string()
                },
                FilterPredicate {
                    column: "channel".to_string(),
                    value: "app".to_string()
                },
            ]
        );
    }

    #[test]
    fn empty_rule_is_rejected() {
        assert!(matches!(parse_rule("   "), Err(RuleError::Empty)));
    }

    #[test]
    fn segment_without_equals_is_malformed() {
        let err = parse_rule("inType=hbase##justakey").unwrap_err();
        assert!(matches!(err, RuleError::Malformed(s) if s == "justakey"));
    }

    #[test]
    fn unsupported_kind_is_rejected_explicitly() {
        let rule = "inType=mysql##hbaseTable=t##family=f##selectFieldNames=a,b";
        let err = parse_rule(rule).unwrap_err();
        assert!(matches!(err, RuleError::UnsupportedSourceKind(k) if k == "mysql"));
    }

    #[test]
    fn missing_table_is_rejected() {
        let err = parse_rule("inType=hbase##family=f##selectFieldNames=a").unwrap_err();
        assert!(matches!(err, RuleError::MissingKey("hbaseTable")));
    }

    #[test]
    fn blank_select_fields_are_rejected() {
        let err =
            parse_rule("inType=hbase##hbaseTable=t##family=f##selectFieldNames=, ,").unwrap_err();
        assert!(matches!(err, RuleError::MissingKey("selectFieldNames")));
    }

    #[test]
    fn bad_filter_is_rejected() {
        let rule = "inType=hbase##hbaseTable=t##family=f##selectFieldNames=a,b\
                    ##whereFieldNames=nodelimiter";
        let err = parse_rule(rule).unwrap_err();
        assert!(matches!(err, RuleError::InvalidFilter(f) if f == "nodelimiter"));
    }
}
