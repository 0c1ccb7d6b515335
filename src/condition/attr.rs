//! Target-entity attribute conditions
//!
//! Each condition is a string of the form `operator::value`:
//!
//! - `equal::active` - the attribute must equal `active`
//! - `include::admin` - the attribute must contain `admin` as a substring
//! - `any::a,b,c` - the attribute must be one of the comma-separated values
//!
//! The split is on the first `::` only, so an `any` value list may itself
//! contain further colons.

use std::collections::BTreeMap;
use std::collections::HashMap;

/// Attribute matcher operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOperator {
    Equal,
    Include,
    Any,
}

/// A parsed `operator::value` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRule {
    pub operator: AttrOperator,
    pub value: String,
}

impl AttributeRule {
    /// Parse one condition string. `equal` and `include` take a single
    /// value (no commas); `any` takes a comma-separated list.
    pub fn parse(raw: &str) -> Option<Self> {
        let (keyword, value) = raw.split_once("::")?;
        let operator = match keyword {
            "equal" => AttrOperator::Equal,
            "include" => AttrOperator::Include,
            "any" => AttrOperator::Any,
            _ => return None,
        };
        if matches!(operator, AttrOperator::Equal | AttrOperator::Include) && value.contains(',') {
            return None;
        }
        Some(AttributeRule {
            operator,
            value: value.to_string(),
        })
    }

    /// Whether the entity's actual value satisfies this rule.
    pub fn satisfied_by(&self, actual: &str) -> bool {
        match self.operator {
            AttrOperator::Equal => actual == self.value,
            AttrOperator::Include => actual.contains(&self.value),
            AttrOperator::Any => self.value.split(',').any(|v| v == actual),
        }
    }
}

/// Evaluate merged attribute conditions against a target entity.
///
/// For every conditioned attribute that exists on the entity, at least one
/// of its conditions must pass (OR within an attribute); attributes absent
/// from the entity are skipped. All checked attributes must pass (AND
/// across attributes). Conditions that fail to parse count as unsatisfied.
pub fn attributes_allowed(
    conditions: &BTreeMap<String, Vec<String>>,
    entity: &HashMap<String, String>,
) -> bool {
    for (attribute, rules) in conditions {
        let Some(actual) = entity.get(attribute) else {
            continue;
        };
        let passed = rules
            .iter()
            .filter_map(|r| AttributeRule::parse(r))
            .any(|rule| rule.satisfied_by(actual));
        if !passed {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conds(pairs: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    fn entity(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_operators() {
        assert_eq!(
            AttributeRule::parse("equal::active").unwrap().operator,
            AttrOperator::Equal
        );
        assert_eq!(
            AttributeRule::parse("include::adm").unwrap().operator,
            AttrOperator::Include
        );
        assert_eq!(
            AttributeRule::parse("any::a,b").unwrap().operator,
            AttrOperator::Any
        );
        assert!(AttributeRule::parse("between::1,9").is_none());
        assert!(AttributeRule::parse("equal").is_none());
    }

    #[test]
    fn test_single_value_operators_reject_commas() {
        assert!(AttributeRule::parse("equal::a,b").is_none());
        assert!(AttributeRule::parse("include::a,b").is_none());
    }

    #[test]
    fn test_split_on_first_separator_only() {
        let rule = AttributeRule::parse("equal::ns::value").unwrap();
        assert_eq!(rule.value, "ns::value");
    }

    #[test]
    fn test_equal() {
        let rule = AttributeRule::parse("equal::active").unwrap();
        assert!(rule.satisfied_by("active"));
        assert!(!rule.satisfied_by("inactive"));
    }

    #[test]
    fn test_include() {
        let rule = AttributeRule::parse("include::min").unwrap();
        assert!(rule.satisfied_by("admin"));
        assert!(!rule.satisfied_by("user"));
    }

    #[test]
    fn test_any() {
        let rule = AttributeRule::parse("any::draft,published").unwrap();
        assert!(rule.satisfied_by("draft"));
        assert!(rule.satisfied_by("published"));
        assert!(!rule.satisfied_by("archived"));
    }

    #[test]
    fn test_absent_attribute_is_skipped() {
        let conditions = conds(&[("status", &["equal::active"])]);
        let target = entity(&[("owner", "alice")]);
        assert!(attributes_allowed(&conditions, &target));
    }

    #[test]
    fn test_present_attribute_must_pass() {
        let conditions = conds(&[("status", &["equal::active"])]);
        assert!(attributes_allowed(&conditions, &entity(&[("status", "active")])));
        assert!(!attributes_allowed(
            &conditions,
            &entity(&[("status", "inactive")])
        ));
    }

    #[test]
    fn test_or_within_attribute() {
        let conditions = conds(&[("status", &["equal::draft", "equal::published"])]);
        assert!(attributes_allowed(
            &conditions,
            &entity(&[("status", "published")])
        ));
        assert!(!attributes_allowed(
            &conditions,
            &entity(&[("status", "archived")])
        ));
    }

    #[test]
    fn test_and_across_attributes() {
        let conditions = conds(&[
            ("status", &["equal::active"]),
            ("plan", &["any::pro,enterprise"]),
        ]);
        assert!(attributes_allowed(
            &conditions,
            &entity(&[("status", "active"), ("plan", "pro")])
        ));
        assert!(!attributes_allowed(
            &conditions,
            &entity(&[("status", "active"), ("plan", "free")])
        ));
    }

    #[test]
    fn test_unparsable_condition_denies() {
        let conditions = conds(&[("status", &["bogus"])]);
        assert!(!attributes_allowed(
            &conditions,
            &entity(&[("status", "active")])
        ));
    }
}
