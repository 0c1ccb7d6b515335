//! ACL Policy Engine
//!
//! A policy-based authorization engine: given a principal, a requested
//! resource and action, and optional target-instance context, it decides
//! Allow/Deny from JSON policy documents attached to the principal
//! directly, via roles, via teams, and via team-roles.
//!
//! ## Features
//!
//! - **JSON policy documents** with Allow/Reject statements and
//!   deny-overrides semantics (one matching Reject vetoes every Allow)
//! - **Structured resource strings** (`prefix::resource::scope`) matched by
//!   exact segment, with per-instance scope keys for scopeable actions
//! - **Condition evaluation**: source IP (single, CIDR, range), time
//!   windows (clock or absolute, wrap-past-midnight), weekdays, User-Agent
//!   substrings, and target-entity attribute matchers
//! - **Role and team aggregation** with `session`/`all` team modes and
//!   multi-path de-duplication
//! - **Fail-closed decisions**: every unresolved lookup or malformed input
//!   denies; the decision API never errors
//! - **Injected catalog snapshot** so tests run against an in-memory fake
//!
//! ## Example
//!
//! ```
//! use acl_engine::{
//!     AccessRequest, AclConfig, DecisionEngine, InMemoryCatalog, PolicyDocument, PolicyRecord,
//!     PrincipalPolicies, RequestContext, ResourceDef, validate_document,
//! };
//! use chrono::NaiveDate;
//!
//! // Catalog supplied by the host application.
//! let catalog: InMemoryCatalog = vec![
//!     ResourceDef::new("users").action("read", false).action("delete", true),
//! ]
//! .into_iter()
//! .collect();
//!
//! let config = AclConfig::default();
//!
//! // Validate a document before storing it.
//! let doc = PolicyDocument::from_json(
//!     r#"{
//!         "Version": "1",
//!         "definitions": [
//!             {"Effect": "Allow", "Actions": ["read"], "Resource": "acl::users::"}
//!         ]
//!     }"#,
//! )
//! .unwrap();
//! validate_document(&doc, &catalog, &config).unwrap();
//!
//! // Decide a request.
//! let engine = DecisionEngine::new(catalog, config);
//! let principal = PrincipalPolicies::new().direct(PolicyRecord::new("p1", doc));
//! let now = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap().and_hms_opt(10, 0, 0).unwrap();
//! let ctx = RequestContext::new("10.0.0.1", now, "Mozilla/5.0");
//!
//! assert!(engine.authorize(&principal, &AccessRequest::new("users", "read"), &ctx));
//! assert!(!engine.authorize(&principal, &AccessRequest::new("users", "delete"), &ctx));
//! ```
//!
//! ## Decision flow
//!
//! ```text
//! caller ──▶ DecisionEngine::authorize
//!              │  resolve resource + action against the catalog
//!              ▼
//!            collect_applicable (direct ∪ roles ∪ teams ∪ team-roles,
//!              │                 team-mode filtered, de-duplicated)
//!              ▼
//!            statement_matches (resource segment + action coverage)
//!              ▼
//!            deny-overrides, scope check, merged condition checks
//!              ▼
//!            Allow / Deny
//! ```
//!
//! Each decision is a pure, read-only computation over externally supplied
//! snapshots; decisions can run fully in parallel.

pub mod aggregate;
pub mod catalog;
pub mod condition;
pub mod config;
pub mod engine;
pub mod error;
pub mod policy;
pub mod resource;
pub mod validate;

pub use aggregate::{collect_applicable, PolicyRecord, PrincipalPolicies, TeamPolicies};
pub use catalog::{ActionDef, InMemoryCatalog, ResourceCatalog, ResourceDef};
pub use condition::{
    attributes_allowed, ip_allowed, time_allowed, user_agent_allowed, weekday_allowed,
    AttrOperator, AttributeRule, IpRule, MergedConditions, TimeRule,
};
pub use config::AclConfig;
pub use engine::{AccessRequest, DecisionEngine, EntityAttributes, RequestContext};
pub use error::{AclError, Result};
pub use policy::{Actions, ConditionSpec, Effect, PolicyDocument, Statement, TeamMode};
pub use resource::{statement_matches, ResourcePattern};
pub use validate::validate_document;
