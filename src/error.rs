use thiserror::Error;

/// Errors surfaced when a policy document fails validation or cannot be
/// parsed. Evaluation itself never returns an error: every in-decision
/// failure collapses to a Deny.
#[derive(Error, Debug)]
pub enum AclError {
    #[error("Policy document is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid or missing 'Version' field")]
    MissingVersion,

    #[error("The 'definitions' array must contain at least one statement")]
    NoDefinitions,

    #[error("Invalid 'Actions' field: {0} (must be \"*\" or a non-empty array of actions)")]
    InvalidActions(String),

    #[error("Invalid resource format: {0} (expected 'prefix::resource::scope')")]
    MalformedResource(String),

    #[error("Invalid resource prefix: {found} (expected: {expected})")]
    InvalidPrefix { found: String, expected: String },

    #[error("Resource not found: {0}")]
    UnknownResource(String),

    #[error("Unknown action '{action}' for resource '{resource}'")]
    UnknownAction { resource: String, action: String },

    #[error("Invalid IP address or range: {0}")]
    InvalidIp(String),

    #[error("Invalid time window: {0} (expected HH:MM or dd:mm:yyyy HH:MM, single or '-' separated range)")]
    InvalidTime(String),

    #[error("Invalid day of week: {0}")]
    InvalidWeekday(String),

    #[error("Invalid condition for resource attribute '{attribute}': {value} (must be 'equal::v', 'include::v' or 'any::v1,v2')")]
    InvalidAttribute { attribute: String, value: String },
}

pub type Result<T> = std::result::Result<T, AclError>;
