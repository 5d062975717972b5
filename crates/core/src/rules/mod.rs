//! Rules module - level-4 rule parsing and classification rule sets.

mod rules_model;
mod rules_parser;

pub use rules_model::{
    ClassificationRule, FilterPredicate, RuleSet, SourceDescriptor, SourceKind,
};
pub use rules_parser::parse_rule;
