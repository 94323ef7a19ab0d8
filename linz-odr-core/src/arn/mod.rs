//! Role ARN parsing, validation and context lookups (pure Rust)

pub mod components;
pub mod lookup;
pub mod validate;

pub use components::ArnComponents;
pub use lookup::{try_get_context_arn, try_get_context_arns};
pub use validate::{validate_role_arn, validate_role_arn_value, IAM_SERVICE, ROLE_RESOURCE};
