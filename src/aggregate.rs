//! Policy aggregation
//!
//! A principal's applicable-policy set is the union of what it holds
//! directly, what its roles grant, and - when the team feature is enabled -
//! what its teams and team-roles grant. The set is computed fresh for every
//! decision from a [`PrincipalPolicies`] snapshot; nothing is cached across
//! calls.
//!
//! Team-sourced statements are filtered by their `TeamMode`: `session`
//! statements only apply while the owning team is the principal's active
//! team, `all` statements apply regardless, and statements without a mode
//! pass through.

use crate::policy::{PolicyDocument, Statement, TeamMode};
use std::collections::HashSet;

/// A stored policy plus the identity used for de-duplication when the same
/// policy is reachable through multiple paths.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyRecord {
    pub id: String,
    pub document: PolicyDocument,
}

impl PolicyRecord {
    pub fn new(id: impl Into<String>, document: PolicyDocument) -> Self {
        PolicyRecord {
            id: id.into(),
            document,
        }
    }
}

/// Policies attached to one team, keyed by the owning team's id so the
/// `session` team mode can be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamPolicies {
    pub team_id: String,
    pub policies: Vec<PolicyRecord>,
}

impl TeamPolicies {
    pub fn new(team_id: impl Into<String>, policies: Vec<PolicyRecord>) -> Self {
        TeamPolicies {
            team_id: team_id.into(),
            policies,
        }
    }
}

/// Snapshot of every policy reachable from a principal, organised by the
/// path it was reached through. Assembled by the host from its own store;
/// the engine only reads it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrincipalPolicies {
    /// Policies assigned to the principal itself.
    pub direct: Vec<PolicyRecord>,
    /// Policies of roles assigned to the principal.
    pub via_roles: Vec<PolicyRecord>,
    /// Policies assigned to teams the principal belongs to.
    pub via_teams: Vec<TeamPolicies>,
    /// Policies of roles held by those teams.
    pub via_team_roles: Vec<TeamPolicies>,
    /// The principal's active team session, if any.
    pub active_team: Option<String>,
}

impl PrincipalPolicies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a directly-assigned policy.
    pub fn direct(mut self, record: PolicyRecord) -> Self {
        self.direct.push(record);
        self
    }

    /// Builder: add a policy granted through a role.
    pub fn via_role(mut self, record: PolicyRecord) -> Self {
        self.via_roles.push(record);
        self
    }

    /// Builder: add a team's directly-assigned policies.
    pub fn via_team(mut self, team: TeamPolicies) -> Self {
        self.via_teams.push(team);
        self
    }

    /// Builder: add policies granted through a team's roles.
    pub fn via_team_role(mut self, team: TeamPolicies) -> Self {
        self.via_team_roles.push(team);
        self
    }

    /// Builder: set the active team session.
    pub fn active_team(mut self, team_id: impl Into<String>) -> Self {
        self.active_team = Some(team_id.into());
        self
    }
}

/// Collect every applicable policy document for one decision.
///
/// De-duplication is by policy id: a policy reachable through multiple
/// paths contributes once, with the first path encountered winning
/// (direct, then roles, then teams, then team-roles).
pub fn collect_applicable(
    principal: &PrincipalPolicies,
    teams_enabled: bool,
) -> Vec<PolicyDocument> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut documents = Vec::new();

    for record in principal.direct.iter().chain(&principal.via_roles) {
        if seen.insert(record.id.as_str()) {
            documents.push(record.document.clone());
        }
    }

    if !teams_enabled {
        return documents;
    }

    let active = principal.active_team.as_deref();
    for team in principal.via_teams.iter().chain(&principal.via_team_roles) {
        for record in &team.policies {
            if seen.contains(record.id.as_str()) {
                continue;
            }
            let kept: Vec<Statement> = record
                .document
                .definitions
                .iter()
                .filter(|s| team_mode_applies(s.team_mode, &team.team_id, active))
                .cloned()
                .collect();
            // An id is only consumed by a team whose filtered contribution
            // survives; a later team holding the same policy can still
            // contribute it.
            if !kept.is_empty() {
                seen.insert(record.id.as_str());
                documents.push(PolicyDocument {
                    version: record.document.version.clone(),
                    definitions: kept,
                });
            }
        }
    }

    documents
}

fn team_mode_applies(mode: Option<TeamMode>, owning_team: &str, active: Option<&str>) -> bool {
    match mode {
        None | Some(TeamMode::All) => true,
        Some(TeamMode::Session) => active == Some(owning_team),
    }
}
