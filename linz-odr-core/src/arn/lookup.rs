//! Role ARN lookups from context
//!
//! A missing key is a normal configuration state and yields `Ok(None)`. A key
//! that is present but holds anything other than valid role ARNs is an error.

use serde_json::Value;

use super::validate_role_arn;
use crate::context::ContextProvider;
use crate::error::ArnError;

/// Look up a context value, treating JSON `null` the same as a missing key.
pub(crate) fn lookup<'a, P>(provider: &'a P, key: &str) -> Option<&'a Value>
where
    P: ContextProvider + ?Sized,
{
    let value = provider.try_get_context(key).filter(|value| !value.is_null());
    if value.is_none() {
        log::debug!("Context \"{}\" is not set", key);
    }
    value
}

/// Lookup a role ARN from context
///
/// Returns the ARN exactly as configured if it is a valid role ARN, `None` if
/// the key is not set.
pub fn try_get_context_arn<P>(provider: &P, key: &str) -> Result<Option<String>, ArnError>
where
    P: ContextProvider + ?Sized,
{
    let Some(value) = lookup(provider, key) else {
        return Ok(None);
    };
    Ok(Some(validated_arn(value)?.to_string()))
}

/// Lookup a list of role ARNs from context
///
/// Every entry must be a valid role ARN, the first invalid entry fails the
/// whole lookup. Order and duplicates are preserved.
pub fn try_get_context_arns<P>(provider: &P, key: &str) -> Result<Option<Vec<String>>, ArnError>
where
    P: ContextProvider + ?Sized,
{
    let Some(value) = lookup(provider, key) else {
        return Ok(None);
    };
    let Some(entries) = value.as_array() else {
        return Err(ArnError::NotAList {
            key: key.to_string(),
            found: value.to_string(),
        });
    };

    let mut arns = Vec::with_capacity(entries.len());
    for entry in entries {
        arns.push(validated_arn(entry)?.to_string());
    }
    log::debug!("Context \"{}\" holds {} role ARNs", key, arns.len());
    Ok(Some(arns))
}

/// The ARN string as configured, once it has been validated as a role ARN.
fn validated_arn(value: &Value) -> Result<&str, ArnError> {
    let Some(arn) = value.as_str() else {
        return Err(ArnError::NotAString {
            found: value.to_string(),
        });
    };
    validate_role_arn(arn)?;
    Ok(arn)
}
