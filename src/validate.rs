//! Write-time policy document validation
//!
//! Runs before a document is accepted into storage. Checks are ordered and
//! fail-fast: the first violation is returned and nothing after it is
//! examined. The decision engine trusts already-validated documents, though
//! re-running the validator at evaluation time is safe.
//!
//! Structural rules (field presence, enum values) are enforced by the typed
//! model during deserialization; this module covers the semantic rules the
//! types cannot express: catalog membership, the resource grammar, and the
//! condition micro-grammars.

use crate::catalog::ResourceCatalog;
use crate::condition::{parse_weekday, AttributeRule, IpRule, TimeRule};
use crate::config::AclConfig;
use crate::error::{AclError, Result};
use crate::policy::{Actions, ConditionSpec, PolicyDocument};
use crate::resource::ResourcePattern;

/// Validate a policy document against the catalog and configuration.
pub fn validate_document<C: ResourceCatalog>(
    document: &PolicyDocument,
    catalog: &C,
    config: &AclConfig,
) -> Result<()> {
    if document.version.trim().is_empty() {
        return Err(AclError::MissingVersion);
    }
    if document.definitions.is_empty() {
        return Err(AclError::NoDefinitions);
    }

    for statement in &document.definitions {
        validate_actions_shape(&statement.actions)?;

        let pattern = ResourcePattern::parse(&statement.resource)?;
        if pattern.prefix != config.resource_prefix {
            return Err(AclError::InvalidPrefix {
                found: pattern.prefix,
                expected: config.resource_prefix.clone(),
            });
        }

        let resource = catalog
            .resolve(&pattern.resource)
            .ok_or_else(|| AclError::UnknownResource(pattern.resource.clone()))?;

        if let Actions::List(actions) = &statement.actions {
            for action in actions {
                if resource.find_action(action).is_none() {
                    return Err(AclError::UnknownAction {
                        resource: resource.name.clone(),
                        action: action.clone(),
                    });
                }
            }
        }

        if let Some(conditions) = &statement.conditions {
            validate_conditions(conditions)?;
        }
    }

    Ok(())
}

fn validate_actions_shape(actions: &Actions) -> Result<()> {
    match actions {
        Actions::Wildcard(token) if token != "*" => Err(AclError::InvalidActions(token.clone())),
        Actions::List(list) if list.is_empty() => Err(AclError::InvalidActions("[]".to_string())),
        _ => Ok(()),
    }
}

fn validate_conditions(conditions: &ConditionSpec) -> Result<()> {
    for ip in &conditions.ips {
        IpRule::parse(ip)?;
    }

    if let Some(time) = &conditions.time {
        TimeRule::parse(time)?;
    }

    if let Some(days) = &conditions.days_of_week {
        for day in days {
            parse_weekday(day).ok_or_else(|| AclError::InvalidWeekday(day.clone()))?;
        }
    }

    if let Some(attributes) = &conditions.resource_attributes {
        for (attribute, condition) in attributes {
            AttributeRule::parse(condition).ok_or_else(|| AclError::InvalidAttribute {
                attribute: attribute.clone(),
                value: condition.clone(),
            })?;
        }
    }

    Ok(())
}
