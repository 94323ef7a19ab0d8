//! Principals built from role ARNs, and the trust policies that let them
//! assume a role.

use crate::arn::lookup::lookup;
use crate::arn::{try_get_context_arn, try_get_context_arns};
use crate::context::ContextProvider;
use crate::error::ArnError;
use crate::policy::{OneOrMany, PolicyDocument, PolicyPrincipal, Statement};

const ASSUME_ROLE_ACTION: &str = "sts:AssumeRole";

/// One or more ARNs allowed to assume a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// Exactly one ARN
    Single { arn: String },
    /// Two or more ARNs, in the order they were supplied
    Composite { arns: Vec<String> },
}

impl Principal {
    /// The ARNs making up this principal
    pub fn arns(&self) -> &[String] {
        match self {
            Self::Single { arn } => std::slice::from_ref(arn),
            Self::Composite { arns } => arns,
        }
    }

    /// Trust policy allowing this principal to `sts:AssumeRole`.
    pub fn assume_role_policy(&self) -> PolicyDocument {
        PolicyDocument::new(vec![Statement::allow(vec![ASSUME_ROLE_ACTION.to_string()])
            .with_principal(PolicyPrincipal::from(self))])
    }
}

impl From<&Principal> for PolicyPrincipal {
    fn from(principal: &Principal) -> Self {
        let aws = match principal {
            Principal::Single { arn } => OneOrMany::One(arn.clone()),
            Principal::Composite { arns } => OneOrMany::Many(arns.clone()),
        };
        Self { aws }
    }
}

/// A single ARN or an ordered list of ARNs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArnList(Vec<String>);

impl ArnList {
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for ArnList {
    fn from(arn: &str) -> Self {
        Self(vec![arn.to_string()])
    }
}

impl From<String> for ArnList {
    fn from(arn: String) -> Self {
        Self(vec![arn])
    }
}

impl From<Vec<String>> for ArnList {
    fn from(arns: Vec<String>) -> Self {
        Self(arns)
    }
}

impl From<&[String]> for ArnList {
    fn from(arns: &[String]) -> Self {
        Self(arns.to_vec())
    }
}

impl From<Vec<&str>> for ArnList {
    fn from(arns: Vec<&str>) -> Self {
        Self(arns.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for ArnList {
    fn from(arns: &[&str]) -> Self {
        Self(arns.iter().map(|arn| (*arn).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ArnList {
    fn from(arns: [&str; N]) -> Self {
        Self(arns.iter().map(|arn| (*arn).to_string()).collect())
    }
}

/// Build a principal from one or more ARNs.
///
/// The ARNs are not validated here. Callers are expected to obtain them through
/// [`try_get_context_arn`] / [`try_get_context_arns`] (or
/// [`try_get_context_principal`]) which do validate, so anything passed in
/// directly is trusted as is.
///
/// # Errors
///
/// [`ArnError::NoArnsSupplied`] if the list is empty.
pub fn get_arn_principal(arns: impl Into<ArnList>) -> Result<Principal, ArnError> {
    let mut arns = arns.into().into_inner();
    match arns.len() {
        0 => Err(ArnError::NoArnsSupplied),
        1 => Ok(Principal::Single {
            arn: arns.remove(0),
        }),
        _ => Ok(Principal::Composite { arns }),
    }
}

/// Lookup a principal from a context key holding either one role ARN or a
/// list of role ARNs.
///
/// An empty list is rejected the same way [`get_arn_principal`] rejects it.
pub fn try_get_context_principal<P>(provider: &P, key: &str) -> Result<Option<Principal>, ArnError>
where
    P: ContextProvider + ?Sized,
{
    let arns = match lookup(provider, key) {
        None => return Ok(None),
        Some(value) if value.is_array() => try_get_context_arns(provider, key)?,
        Some(_) => try_get_context_arn(provider, key)?.map(|arn| vec![arn]),
    };
    arns.map(get_arn_principal).transpose()
}
