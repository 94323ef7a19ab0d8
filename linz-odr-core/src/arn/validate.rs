//! Validation that a value is an AWS IAM role ARN

use serde_json::Value;

use super::ArnComponents;
use crate::error::ArnError;

/// Service namespace every role ARN must have
pub const IAM_SERVICE: &str = "iam";
/// Resource type every role ARN must have
pub const ROLE_RESOURCE: &str = "role";

/// Validate that a string is an AWS IAM role ARN.
///
/// Wildcards are never accepted, a role ARN used in a trust policy must name
/// exactly one role.
///
/// # Errors
///
/// * [`ArnError::Wildcard`] if the ARN contains `*`
/// * [`ArnError::Parse`] if the ARN does not follow the slash separated grammar,
///   the structural cause is available as the error source
/// * [`ArnError::NotIamService`] / [`ArnError::NotRoleResource`] if the ARN is
///   well formed but does not identify an IAM role
pub fn validate_role_arn(arn: &str) -> Result<ArnComponents, ArnError> {
    if arn.contains('*') {
        return Err(ArnError::Wildcard {
            arn: arn.to_string(),
        });
    }

    let components = ArnComponents::parse(arn).map_err(|source| ArnError::Parse {
        arn: arn.to_string(),
        source,
    })?;

    if components.service != IAM_SERVICE {
        return Err(ArnError::NotIamService {
            arn: arn.to_string(),
            service: components.service,
        });
    }
    if components.resource != ROLE_RESOURCE {
        return Err(ArnError::NotRoleResource {
            arn: arn.to_string(),
            resource: components.resource,
        });
    }

    Ok(components)
}

/// Validate that an arbitrary JSON value is an AWS IAM role ARN.
///
/// Context values are untyped, so anything other than a JSON string is
/// rejected with [`ArnError::NotAString`] before any parsing happens.
pub fn validate_role_arn_value(value: &Value) -> Result<ArnComponents, ArnError> {
    let Some(arn) = value.as_str() else {
        return Err(ArnError::NotAString {
            found: value.to_string(),
        });
    };
    validate_role_arn(arn)
}
