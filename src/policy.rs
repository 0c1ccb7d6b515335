//! Policy document structure
//!
//! Policies are JSON documents attached to principals (directly or through
//! roles and teams). Each document carries a version and one or more
//! statements; each statement grants or rejects a set of actions on one
//! resource pattern, optionally gated by conditions.
//!
//! Wire format (field names match the stored JSON exactly):
//!
//! ```json
//! {
//!   "Version": "1",
//!   "definitions": [
//!     {
//!       "Effect": "Allow",
//!       "Actions": ["read", "update"],
//!       "Resource": "acl::users::5,6",
//!       "TeamMode": "session",
//!       "Conditions": {
//!         "ips": ["10.0.0.0/24"],
//!         "time": "09:00-17:00",
//!         "daysOfWeek": ["Monday", "Tuesday"],
//!         "User-Agent": "Mozilla",
//!         "resourceAttributes": { "status": "equal::active" }
//!       }
//!     }
//!   ]
//! }
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Effect of a policy statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Grant the statement's actions.
    Allow,
    /// Veto the statement's actions (takes precedence over any Allow).
    Reject,
}

/// How a team-sourced statement relates to the principal's active team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamMode {
    /// Applies only while the owning team is the principal's active team.
    Session,
    /// Applies regardless of which team is active.
    All,
}

/// The `Actions` field: either the literal `"*"` or an array of action names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Actions {
    Wildcard(String),
    List(Vec<String>),
}

impl Actions {
    /// The full-wildcard value.
    pub fn any() -> Self {
        Actions::Wildcard("*".to_string())
    }

    /// Build a concrete action list.
    pub fn list<I, S>(actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Actions::List(actions.into_iter().map(Into::into).collect())
    }

    /// Whether this field is the wildcard `"*"`. Any other string in the
    /// wildcard position grants nothing, even before validation runs.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Actions::Wildcard(t) if t == "*")
    }

    /// Whether the given action is covered by this field.
    pub fn covers(&self, action: &str) -> bool {
        match self {
            Actions::Wildcard(t) => t == "*",
            Actions::List(actions) => actions.iter().any(|a| a == action),
        }
    }
}

/// Optional per-statement conditions, kept in their stored string grammars.
///
/// Parsing into typed rules happens in [`crate::condition`]; the document
/// model stores what the author wrote so round-trips are lossless.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionSpec {
    /// Single IPs, CIDR blocks (`10.0.0.0/24`) or inclusive ranges
    /// (`10.0.0.1-10.0.0.9`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ips: Vec<String>,

    /// Clock-time window `HH:MM[-HH:MM]` or absolute window
    /// `dd:mm:yyyy HH:MM[-dd:mm:yyyy HH:MM]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    /// Full English weekday names, capitalised.
    #[serde(rename = "daysOfWeek", default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<String>>,

    /// Substring the client's User-Agent header must contain.
    #[serde(rename = "User-Agent", default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Per-attribute matchers of the form `operator::value` with
    /// `operator` one of `equal`, `include`, `any`.
    #[serde(
        rename = "resourceAttributes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub resource_attributes: Option<BTreeMap<String, String>>,
}

/// A single policy statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub effect: Effect,

    pub actions: Actions,

    /// Resource string of the form `prefix::resource::scope`.
    pub resource: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_mode: Option<TeamMode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<ConditionSpec>,
}

impl Statement {
    /// Create a statement with no team mode and no conditions.
    pub fn new(effect: Effect, actions: Actions, resource: impl Into<String>) -> Self {
        Statement {
            effect,
            actions,
            resource: resource.into(),
            team_mode: None,
            conditions: None,
        }
    }

    /// Builder: set the team mode.
    pub fn with_team_mode(mut self, mode: TeamMode) -> Self {
        self.team_mode = Some(mode);
        self
    }

    /// Builder: set the conditions.
    pub fn with_conditions(mut self, conditions: ConditionSpec) -> Self {
        self.conditions = Some(conditions);
        self
    }
}

/// Complete policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    pub version: String,

    pub definitions: Vec<Statement>,
}

impl PolicyDocument {
    /// Create an empty document with the given version.
    pub fn new(version: impl Into<String>) -> Self {
        PolicyDocument {
            version: version.into(),
            definitions: Vec::new(),
        }
    }

    /// Builder: append a statement.
    pub fn statement(mut self, statement: Statement) -> Self {
        self.definitions.push(statement);
        self
    }

    /// Parse a document from its stored JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the document back to JSON text.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_covers() {
        assert!(Actions::any().covers("read"));
        assert!(Actions::list(["read", "update"]).covers("read"));
        assert!(!Actions::list(["read", "update"]).covers("delete"));
    }

    #[test]
    fn test_non_star_wildcard_token_grants_nothing() {
        // An unvalidated document can carry any string in the wildcard
        // position; only the literal "*" is a grant.
        let bogus = Actions::Wildcard("none".to_string());
        assert!(!bogus.is_wildcard());
        assert!(!bogus.covers("read"));
    }

    #[test]
    fn test_document_json_roundtrip() {
        let doc = PolicyDocument::new("1").statement(
            Statement::new(Effect::Allow, Actions::list(["read"]), "acl::users::")
                .with_team_mode(TeamMode::All),
        );

        let json = doc.to_json().unwrap();
        let parsed = PolicyDocument::from_json(&json).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_wire_field_names() {
        let json = r#"{
            "Version": "1",
            "definitions": [
                {
                    "Effect": "Allow",
                    "Actions": "*",
                    "Resource": "acl::users::",
                    "TeamMode": "session",
                    "Conditions": {
                        "ips": ["10.0.0.1"],
                        "time": "09:00-17:00",
                        "daysOfWeek": ["Monday"],
                        "User-Agent": "curl",
                        "resourceAttributes": {"status": "equal::active"}
                    }
                }
            ]
        }"#;

        let doc = PolicyDocument::from_json(json).unwrap();
        let stmt = &doc.definitions[0];
        assert!(stmt.actions.is_wildcard());
        assert_eq!(stmt.team_mode, Some(TeamMode::Session));

        let conds = stmt.conditions.as_ref().unwrap();
        assert_eq!(conds.ips, vec!["10.0.0.1"]);
        assert_eq!(conds.time.as_deref(), Some("09:00-17:00"));
        assert_eq!(conds.user_agent.as_deref(), Some("curl"));
        assert_eq!(
            conds.resource_attributes.as_ref().unwrap().get("status"),
            Some(&"equal::active".to_string())
        );
    }

    #[test]
    fn test_reject_effect_parses() {
        let json = r#"{
            "Version": "1",
            "definitions": [
                {"Effect": "Reject", "Actions": ["delete"], "Resource": "acl::users::"}
            ]
        }"#;
        let doc = PolicyDocument::from_json(json).unwrap();
        assert_eq!(doc.definitions[0].effect, Effect::Reject);
    }

    #[test]
    fn test_invalid_effect_is_rejected_at_parse() {
        let json = r#"{
            "Version": "1",
            "definitions": [
                {"Effect": "Maybe", "Actions": ["read"], "Resource": "acl::users::"}
            ]
        }"#;
        assert!(PolicyDocument::from_json(json).is_err());
    }
}
