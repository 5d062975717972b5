#[cfg(test)]
mod tests {
    use crate::errors::ConfigurationError;
    use crate::tags::{TagDefinition, TagModel};
    use chrono::NaiveDateTime;

    fn ts() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2024-01-01 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn tag(id: i64, level: i32, parent_id: Option<i64>, rule: Option<&str>) -> TagDefinition {
        TagDefinition {
            id,
            name: format!("tag-{}", id),
            industry: None,
            rule: rule.map(str::to_string),
            business_key: None,
            level,
            parent_id,
            state: 1,
            remark: None,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    #[test]
    fn builds_model_from_ordered_bundle() {
        let defs = vec![
            tag(15, 4, Some(3), Some("inType=hbase##hbaseTable=t##family=f##selectFieldNames=id,m")),
            tag(89, 5, Some(15), Some("1")),
            tag(90, 5, Some(15), Some("2")),
        ];

        let model = TagModel::from_definitions(15, defs).unwrap();
        assert_eq!(model.model_tag.id, 15);
        assert_eq!(model.leaves.len(), 2);
        assert_eq!(model.leaves[0].id, 89);
    }

    #[test]
    fn empty_bundle_is_tag_not_found() {
        let err = TagModel::from_definitions(15, vec![]).unwrap_err();
        assert!(matches!(err, ConfigurationError::TagNotFound(15)));
    }

    #[test]
    fn missing_rule_is_fatal() {
        let defs = vec![tag(15, 4, Some(3), None), tag(89, 5, Some(15), Some("1"))];
        let err = TagModel::from_definitions(15, defs).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingRule(15)));
    }

    #[test]
    fn blank_rule_is_fatal() {
        let defs = vec![tag(15, 4, Some(3), Some("   ")), tag(89, 5, Some(15), Some("1"))];
        let err = TagModel::from_definitions(15, defs).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingRule(15)));
    }

    #[test]
    fn missing_children_is_fatal() {
        let defs = vec![tag(15, 4, Some(3), Some("inType=hbase"))];
        let err = TagModel::from_definitions(15, defs).unwrap_err();
        assert!(matches!(err, ConfigurationError::NoChildren(15)));
    }

    #[test]
    fn rejects_non_model_level() {
        let defs = vec![tag(3, 3, None, Some("rule")), tag(89, 5, Some(15), Some("1"))];
        let err = TagModel::from_definitions(3, defs).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::NotAModelTag { tag_id: 3, level: 3 }
        ));
    }
}
