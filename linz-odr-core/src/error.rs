//! Error types for the open data registry core.
//!
//! Every variant carries the offending input so a caller can report it without
//! having to thread the original value alongside the error.

use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of an [`ArnError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A value of the wrong shape was supplied (not a string, not a list).
    Type,
    /// The ARN contains a wildcard.
    InvalidArn,
    /// The ARN does not follow the `arn:partition:service:region:account:type/name` grammar.
    Parse,
    /// The ARN parsed, but it does not identify an IAM role.
    Semantic,
    /// An empty list of ARNs was supplied where at least one is required.
    Value,
}

/// Structural reasons an ARN string could not be split into its components.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArnParseError {
    #[error("ARNs must start with \"arn:\" and have at least 6 components, found {components}")]
    Shape { components: usize },

    #[error("the partition component (2nd component) of an ARN is required")]
    MissingPartition,

    #[error("the service component (3rd component) of an ARN is required")]
    MissingService,

    #[error("the resource component (6th component) of an ARN is required")]
    MissingResource,

    #[error("resource \"{resource}\" is missing the \"/\" separating the resource type from its name")]
    MissingResourceSeparator { resource: String },

    #[error("resource \"{resource}\" has an empty resource name")]
    MissingResourceName { resource: String },
}

/// Errors raised while validating role ARNs or building principals from them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArnError {
    #[error("Failed to parse ARN, is not a string: {found}")]
    NotAString { found: String },

    #[error("Context \"{key}\" must be a list of strings, found: {found}")]
    NotAList { key: String, found: String },

    #[error("ARN cannot include \"*\": {arn}")]
    Wildcard { arn: String },

    #[error("Failed to parse ARN: \"{arn}\"")]
    Parse {
        arn: String,
        #[source]
        source: ArnParseError,
    },

    #[error("ARN is not a iam service: \"{arn}\" has service \"{service}\"")]
    NotIamService { arn: String, service: String },

    #[error("ARN is not a role: \"{arn}\" has resource type \"{resource}\"")]
    NotRoleResource { arn: String, resource: String },

    #[error("No ARNs supplied, a principal needs at least one")]
    NoArnsSupplied,
}

impl ArnError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAString { .. } | Self::NotAList { .. } => ErrorKind::Type,
            Self::Wildcard { .. } => ErrorKind::InvalidArn,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::NotIamService { .. } | Self::NotRoleResource { .. } => ErrorKind::Semantic,
            Self::NoArnsSupplied => ErrorKind::Value,
        }
    }
}

/// Errors raised while loading context values.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Failed to read context file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse context from {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Context in {origin} must be a JSON object")]
    NotAnObject { origin: String },

    #[error("Invalid context override \"{value}\", expected key=value")]
    InvalidOverride { value: String },
}

/// Errors raised while describing stacks.
#[derive(Debug, Error)]
pub enum StackError {
    #[error("Invalid dataset name \"{name}\": {reason}")]
    InvalidDatasetName { name: String, reason: String },

    #[error("Dataset \"{name}\" is defined more than once")]
    DuplicateDataset { name: String },

    #[error("Context \"{key}\" must be a list of dataset names, found: {found}")]
    InvalidDatasetList { key: String, found: String },

    #[error(transparent)]
    Arn(#[from] ArnError),
}

/// Top level error for the crate's public API.
#[derive(Debug, Error)]
pub enum OdrError {
    #[error(transparent)]
    Arn(#[from] ArnError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Stack(#[from] StackError),
}

/// Result type alias for the crate's public API.
pub type OdrResult<T> = Result<T, OdrError>;
