//! Authorization decision engine
//!
//! Orchestrates catalog lookup, policy aggregation, statement matching and
//! condition evaluation into a single fail-closed Allow/Deny decision. Every
//! unresolved lookup or failed check denies; the decision API never errors
//! and never answers "unknown".
//!
//! A decision is a pure, synchronous computation over the supplied
//! snapshots: no I/O, no locks, no mutation. Concurrent decisions are safe
//! to run in parallel.

use crate::aggregate::{collect_applicable, PrincipalPolicies};
use crate::catalog::ResourceCatalog;
use crate::condition::{
    attributes_allowed, ip_allowed, time_allowed, user_agent_allowed, weekday_allowed,
    MergedConditions,
};
use crate::config::AclConfig;
use crate::policy::{Effect, Statement};
use crate::resource::{statement_matches, ResourcePattern};
use chrono::NaiveDateTime;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Attribute values of the target entity, for scoped attribute checks.
pub type EntityAttributes = HashMap<String, String>;

/// Everything the condition evaluators need about the incoming request,
/// materialized by the caller before the decision starts. The engine never
/// reads ambient request state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub source_ip: String,
    pub now: NaiveDateTime,
    pub user_agent: String,
}

impl RequestContext {
    pub fn new(
        source_ip: impl Into<String>,
        now: NaiveDateTime,
        user_agent: impl Into<String>,
    ) -> Self {
        RequestContext {
            source_ip: source_ip.into(),
            now,
            user_agent: user_agent.into(),
        }
    }
}

/// One authorization question: may the principal perform `action` on
/// `resource`, optionally against a specific target instance?
#[derive(Debug, Clone, Default)]
pub struct AccessRequest<'a> {
    pub resource: &'a str,
    /// Action name, or `"*"` to ask about the resource as a whole.
    pub action: &'a str,
    /// Target-instance key, for scopeable actions.
    pub target_key: Option<&'a str>,
    /// Target-entity attributes, for attribute-conditioned checks.
    pub target_entity: Option<&'a EntityAttributes>,
}

impl<'a> AccessRequest<'a> {
    pub fn new(resource: &'a str, action: &'a str) -> Self {
        AccessRequest {
            resource,
            action,
            target_key: None,
            target_entity: None,
        }
    }

    /// Builder: name the target instance.
    pub fn target_key(mut self, key: &'a str) -> Self {
        self.target_key = Some(key);
        self
    }

    /// Builder: attach the target entity's attributes.
    pub fn target_entity(mut self, entity: &'a EntityAttributes) -> Self {
        self.target_entity = Some(entity);
        self
    }
}

/// The decision engine. Holds the injected catalog snapshot and the engine
/// configuration; all per-request data arrives through
/// [`authorize`](DecisionEngine::authorize).
#[derive(Debug, Clone)]
pub struct DecisionEngine<C> {
    catalog: C,
    config: AclConfig,
}

impl<C: ResourceCatalog> DecisionEngine<C> {
    pub fn new(catalog: C, config: AclConfig) -> Self {
        DecisionEngine { catalog, config }
    }

    pub fn config(&self) -> &AclConfig {
        &self.config
    }

    /// Whether an action may be restricted to specific target instances.
    /// Fail-closed: unknown resources and actions answer `false`.
    pub fn is_scopeable(&self, resource: &str, action: &str) -> bool {
        self.catalog
            .resolve(resource)
            .and_then(|r| r.find_action(action))
            .map(|a| a.is_scopeable)
            .unwrap_or(false)
    }

    /// Decide one authorization request.
    ///
    /// Returns `true` only when at least one Allow statement matches, no
    /// Reject statement matches, the scope restriction (if any) admits the
    /// target, and every merged condition passes.
    #[instrument(
        level = "debug",
        skip(self, principal, request, ctx),
        fields(
            resource = request.resource,
            action = request.action,
            target_key = request.target_key,
        )
    )]
    pub fn authorize(
        &self,
        principal: &PrincipalPolicies,
        request: &AccessRequest<'_>,
        ctx: &RequestContext,
    ) -> bool {
        let Some(resource) = self.catalog.resolve(request.resource) else {
            debug!("deny: resource not in catalog");
            return false;
        };

        let is_scopeable = if request.action == "*" {
            false
        } else {
            match resource.find_action(request.action) {
                Some(action) => action.is_scopeable,
                None => {
                    debug!("deny: action not in catalog");
                    return false;
                }
            }
        };

        let documents = collect_applicable(principal, self.config.teams_enabled);
        let statements: Vec<&Statement> = documents
            .iter()
            .flat_map(|d| d.definitions.iter())
            .filter(|s| statement_matches(s, &resource.name, request.action))
            .collect();

        if statements.is_empty() {
            debug!("deny: no matching statements");
            return false;
        }

        // Deny-overrides: a single matching Reject vetoes everything.
        if statements.iter().any(|s| s.effect == Effect::Reject) {
            debug!("deny: explicit reject statement");
            return false;
        }

        if is_scopeable {
            if let Some(key) = request.target_key {
                if !self.scope_admits(&statements, key) {
                    debug!("deny: target key outside statement scope");
                    return false;
                }
            }
        }

        let mut merged = MergedConditions::default();
        for statement in &statements {
            if let Some(conditions) = &statement.conditions {
                merged.merge(conditions);
            }
        }

        if !ip_allowed(&merged.ips, &ctx.source_ip) {
            debug!(source_ip = %ctx.source_ip, "deny: source ip not allowed");
            return false;
        }
        if !time_allowed(&merged.times, ctx.now) {
            debug!("deny: outside allowed time window");
            return false;
        }
        if !weekday_allowed(&merged.days_of_week, ctx.now) {
            debug!("deny: weekday not allowed");
            return false;
        }
        if !user_agent_allowed(&merged.user_agents, &ctx.user_agent) {
            debug!("deny: user agent not allowed");
            return false;
        }

        if is_scopeable {
            if let Some(entity) = request.target_entity {
                if merged.has_attribute_conditions()
                    && !attributes_allowed(&merged.resource_attributes, entity)
                {
                    debug!("deny: target attributes not allowed");
                    return false;
                }
            }
        }

        true
    }

    /// Scope check for scopeable actions with an explicit target key: if no
    /// matching statement restricts scope the action is unrestricted;
    /// otherwise at least one restricting statement must list the key.
    fn scope_admits(&self, statements: &[&Statement], key: &str) -> bool {
        let patterns: Vec<ResourcePattern> = statements
            .iter()
            .filter_map(|s| ResourcePattern::parse(&s.resource).ok())
            .collect();

        if patterns.iter().all(|p| !p.has_scope()) {
            return true;
        }
        patterns.iter().any(|p| p.scope_contains(key))
    }
}
