//! Condition evaluation
//!
//! Pure functions testing an explicit request context against the
//! conditions carried by policy statements:
//! - network origin ([`ip`]): single IPs, CIDR blocks, inclusive ranges
//! - time windows and weekdays ([`time`])
//! - client signature (`User-Agent` substring)
//! - target-entity attribute matchers ([`attr`])
//!
//! Nothing here reads ambient state: the caller materializes the source IP,
//! the current instant and the user agent before evaluation starts, which
//! keeps every check independently testable.

pub mod attr;
pub mod ip;
pub mod time;

pub use attr::{attributes_allowed, AttrOperator, AttributeRule};
pub use ip::{ip_allowed, IpRule};
pub use time::{parse_weekday, time_allowed, weekday_allowed, TimeRule};

use crate::policy::ConditionSpec;
use std::collections::BTreeMap;

/// The union of the conditions of every candidate Allow statement, built
/// fresh per decision. Entries keep their stored string grammars; the
/// evaluators parse them on the fly.
#[derive(Debug, Clone, Default)]
pub struct MergedConditions {
    pub ips: Vec<String>,
    pub times: Vec<String>,
    pub days_of_week: Vec<String>,
    pub user_agents: Vec<String>,
    pub resource_attributes: BTreeMap<String, Vec<String>>,
}

impl MergedConditions {
    /// Fold one statement's conditions into the union.
    pub fn merge(&mut self, spec: &ConditionSpec) {
        self.ips.extend(spec.ips.iter().cloned());
        if let Some(time) = &spec.time {
            self.times.push(time.clone());
        }
        if let Some(days) = &spec.days_of_week {
            self.days_of_week.extend(days.iter().cloned());
        }
        if let Some(ua) = &spec.user_agent {
            self.user_agents.push(ua.clone());
        }
        if let Some(attrs) = &spec.resource_attributes {
            for (attribute, condition) in attrs {
                self.resource_attributes
                    .entry(attribute.clone())
                    .or_default()
                    .push(condition.clone());
            }
        }
    }

    pub fn has_attribute_conditions(&self) -> bool {
        !self.resource_attributes.is_empty()
    }
}

/// True iff `patterns` is empty or the user agent contains at least one
/// pattern as a substring.
pub fn user_agent_allowed(patterns: &[String], user_agent: &str) -> bool {
    patterns.is_empty() || patterns.iter().any(|p| user_agent.contains(p.as_str()))
}
