//! IAM policy documents (deterministic JSON generation)

use std::collections::BTreeMap;

use serde::Serialize;

/// IAM policy language version
pub const POLICY_VERSION: &str = "2012-10-17";

/// A single value or a list of values, the way IAM policies allow either.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Collapse a list of one into [`OneOrMany::One`].
    pub fn from_vec(mut values: Vec<T>) -> Self {
        if values.len() == 1 {
            if let Some(value) = values.pop() {
                return Self::One(value);
            }
        }
        Self::Many(values)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Effect {
    Allow,
}

/// The `Principal` element of a resource or trust policy statement
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PolicyPrincipal {
    #[serde(rename = "AWS")]
    pub aws: OneOrMany<String>,
}

impl PolicyPrincipal {
    /// Any AWS principal
    pub fn any() -> Self {
        Self {
            aws: OneOrMany::One("*".to_string()),
        }
    }
}

/// Condition operator -> condition key -> values
pub type Conditions = BTreeMap<String, BTreeMap<String, OneOrMany<String>>>;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub effect: Effect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<PolicyPrincipal>,
    pub action: OneOrMany<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<OneOrMany<String>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub condition: Conditions,
}

impl Statement {
    /// An `Allow` statement for the given actions with no principal, resource
    /// or condition set.
    pub fn allow(actions: Vec<String>) -> Self {
        Self {
            effect: Effect::Allow,
            principal: None,
            action: OneOrMany::from_vec(actions),
            resource: None,
            condition: Conditions::new(),
        }
    }

    #[must_use]
    pub fn with_principal(mut self, principal: PolicyPrincipal) -> Self {
        self.principal = Some(principal);
        self
    }

    #[must_use]
    pub fn with_resources(mut self, resources: Vec<String>) -> Self {
        self.resource = Some(OneOrMany::from_vec(resources));
        self
    }

    #[must_use]
    pub fn with_condition(mut self, operator: &str, key: &str, values: Vec<String>) -> Self {
        self.condition
            .entry(operator.to_string())
            .or_default()
            .insert(key.to_string(), OneOrMany::from_vec(values));
        self
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

impl PolicyDocument {
    pub fn new(statement: Vec<Statement>) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_policy_json() {
        let policy = PolicyDocument::new(vec![Statement::allow(vec!["s3:GetObject".into()])
            .with_resources(vec!["arn:aws:s3:::bucket/*".into()])]);
        let json = serde_json::to_value(&policy).unwrap();
        assert_eq!(
            json,
            json!({
                "Version": "2012-10-17",
                "Statement": [{
                    "Effect": "Allow",
                    "Action": "s3:GetObject",
                    "Resource": "arn:aws:s3:::bucket/*"
                }]
            })
        );
    }

    #[test]
    fn test_condition_and_principal() {
        let statement = Statement::allow(vec!["sns:Subscribe".into(), "sns:Receive".into()])
            .with_principal(PolicyPrincipal::any())
            .with_condition("StringEquals", "SNS:Protocol", vec!["sqs".into(), "lambda".into()]);
        let json = serde_json::to_value(&statement).unwrap();
        assert_eq!(json["Principal"], json!({"AWS": "*"}));
        assert_eq!(json["Action"], json!(["sns:Subscribe", "sns:Receive"]));
        assert_eq!(
            json["Condition"],
            json!({"StringEquals": {"SNS:Protocol": ["sqs", "lambda"]}})
        );
    }

    #[test]
    fn test_one_or_many_from_vec() {
        assert_eq!(OneOrMany::from_vec(vec![1]), OneOrMany::One(1));
        assert_eq!(OneOrMany::from_vec(vec![1, 2]), OneOrMany::Many(vec![1, 2]));
        assert_eq!(OneOrMany::<i32>::from_vec(vec![]), OneOrMany::Many(vec![]));
    }
}
