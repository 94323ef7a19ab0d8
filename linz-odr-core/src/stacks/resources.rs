//! Description records for the resources a stack declares

use serde::Serialize;
use serde_json::{json, Value};

use crate::policy::{PolicyDocument, Statement};
use crate::principal::Principal;

/// Partition used for ARNs the stacks build themselves
pub const DEFAULT_PARTITION: &str = "aws";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum BucketAccessControl {
    /// Only S3 server access log delivery may write
    LogDeliveryWrite,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum RemovalPolicy {
    /// Keep the resource when the stack is deleted
    Retain,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum StorageClass {
    #[serde(rename = "STANDARD_IA")]
    InfrequentAccess,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Head,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum EventType {
    #[serde(rename = "s3:ObjectCreated:*")]
    ObjectCreated,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Transition {
    pub storage_class: StorageClass,
    pub transition_after_days: u32,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_days: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transitions: Vec<Transition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noncurrent_version_expiration_days: Option<u32>,
    pub expired_object_delete_marker: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abort_incomplete_multipart_upload_after_days: Option<u32>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct CorsRule {
    pub max_age: u32,
    pub allowed_headers: Vec<String>,
    pub allowed_methods: Vec<HttpMethod>,
    pub allowed_origins: Vec<String>,
    pub exposed_headers: Vec<String>,
}

/// Where a bucket writes its server access logs
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct AccessLogs {
    pub bucket_logical_id: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct EventNotification {
    pub event: EventType,
    pub topic_logical_id: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct BucketDescription {
    pub logical_id: String,
    pub bucket_name: String,
    pub versioned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_control: Option<BucketAccessControl>,
    pub block_public_access: bool,
    pub removal_policy: RemovalPolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_access_logs: Option<AccessLogs>,
    pub lifecycle_rules: Vec<LifecycleRule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cors: Vec<CorsRule>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub event_notifications: Vec<EventNotification>,
}

impl BucketDescription {
    /// A private, unversioned bucket kept on stack deletion
    pub fn new(logical_id: &str, bucket_name: &str) -> Self {
        Self {
            logical_id: logical_id.to_string(),
            bucket_name: bucket_name.to_string(),
            versioned: false,
            access_control: None,
            block_public_access: false,
            removal_policy: RemovalPolicy::Retain,
            server_access_logs: None,
            lifecycle_rules: Vec::new(),
            cors: Vec::new(),
            event_notifications: Vec::new(),
        }
    }

    pub fn arn(&self) -> String {
        format!("arn:{DEFAULT_PARTITION}:s3:::{}", self.bucket_name)
    }

    /// ARN matching every object in the bucket
    pub fn objects_arn(&self) -> String {
        format!("{}/*", self.arn())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct TopicDescription {
    pub logical_id: String,
    pub topic_name: String,
    pub resource_policy: PolicyDocument,
}

/// Access a role is granted on a bucket
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum BucketAccess {
    Read,
    ReadWrite,
}

impl BucketAccess {
    /// S3 actions granted for this level of access
    pub fn actions(self) -> Vec<String> {
        let read = ["s3:GetObject*", "s3:GetBucket*", "s3:List*"];
        let write = [
            "s3:DeleteObject*",
            "s3:PutObject",
            "s3:PutObjectLegalHold",
            "s3:PutObjectRetention",
            "s3:PutObjectTagging",
            "s3:PutObjectVersionTagging",
            "s3:Abort*",
        ];
        let actions: Vec<&str> = match self {
            Self::Read => read.to_vec(),
            Self::ReadWrite => read.iter().chain(write.iter()).copied().collect(),
        };
        actions.into_iter().map(str::to_string).collect()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct BucketGrant {
    pub bucket_logical_id: String,
    pub access: BucketAccess,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct RoleDescription {
    pub logical_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
    pub assume_role_policy: PolicyDocument,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub managed_policy_arns: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub grants: Vec<BucketGrant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<PolicyDocument>,
}

impl RoleDescription {
    /// A role that `principal` is allowed to assume
    pub fn assumed_by(logical_id: &str, principal: &Principal) -> Self {
        Self {
            logical_id: logical_id.to_string(),
            role_name: None,
            assume_role_policy: principal.assume_role_policy(),
            managed_policy_arns: Vec::new(),
            grants: Vec::new(),
            policy: None,
        }
    }

    #[must_use]
    pub fn with_role_name(mut self, role_name: String) -> Self {
        self.role_name = Some(role_name);
        self
    }

    /// Attach an AWS managed policy by name, e.g. `ReadOnlyAccess`
    #[must_use]
    pub fn with_aws_managed_policy(mut self, policy_name: &str) -> Self {
        self.managed_policy_arns
            .push(format!("arn:{DEFAULT_PARTITION}:iam::aws:policy/{policy_name}"));
        self
    }

    /// Grant access to a bucket, adding the matching statement to the role's
    /// inline policy.
    #[must_use]
    pub fn with_bucket_grant(mut self, bucket: &BucketDescription, access: BucketAccess) -> Self {
        self.grants.push(BucketGrant {
            bucket_logical_id: bucket.logical_id.clone(),
            access,
        });
        let statement = Statement::allow(access.actions())
            .with_resources(vec![bucket.arn(), bucket.objects_arn()]);
        match self.policy.as_mut() {
            Some(policy) => policy.statement.push(statement),
            None => self.policy = Some(PolicyDocument::new(vec![statement])),
        }
        self
    }

    /// Output value resolving to this role's ARN once deployed
    pub fn arn_output(&self) -> Value {
        json!({ "Fn::GetAtt": [self.logical_id, "Arn"] })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct StackOutput {
    pub key: String,
    pub value: Value,
}

impl StackOutput {
    pub fn new(key: &str, value: Value) -> Self {
        Self {
            key: key.to_string(),
            value,
        }
    }
}
