//! This crate provides the core logic for the LINZ open data registry infrastructure:
//! - IAM role ARN parsing and validation
//! - Role ARN lookups from context and principal construction
//! - Resource name formatting
//! - Stack descriptions for the dataset buckets and console roles
//!

pub mod api;
pub mod arn;
pub mod context;
mod error;
pub mod names;
pub mod policy;
pub mod principal;
pub mod stacks;

// Re-exports for a small, focused public API
pub use api::{load_context, synth, SynthConfig};
pub use arn::{
    try_get_context_arn, try_get_context_arns, validate_role_arn, validate_role_arn_value,
    ArnComponents,
};
pub use context::{Context, ContextProvider};
pub use error::{
    ArnError, ArnParseError, ContextError, ErrorKind, OdrError, OdrResult, StackError,
};
pub use names::title_case;
pub use principal::{get_arn_principal, try_get_context_principal, ArnList, Principal};
