//! Dataset stack: a public data bucket, its access log bucket, an
//! `object_created` topic and the cross-account roles that read logs or manage
//! the data.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::json;

use super::resources::{
    AccessLogs, BucketAccess, BucketAccessControl, BucketDescription, CorsRule, EventNotification,
    EventType, HttpMethod, LifecycleRule, RemovalPolicy, RoleDescription, StackOutput,
    StorageClass, TopicDescription, Transition,
};
use crate::context::ContextProvider;
use crate::error::StackError;
use crate::policy::{PolicyDocument, PolicyPrincipal, Statement};
use crate::principal::try_get_context_principal;

/// Context key holding the role(s) allowed to assume the log reader role
pub const LOG_READER_ROLE_ARN: &str = "log-reader-role-arn";
/// Context key holding the role(s) allowed to assume the data manager role
pub const DATA_MANAGER_ROLE_ARN: &str = "data-manager-role-arn";

/// Days before access logs are deleted
const LOG_EXPIRATION_DAYS: u32 = 30;
/// Days before a noncurrent object version is deleted
const NONCURRENT_VERSION_EXPIRATION_DAYS: u32 = 30;
/// Days before an incomplete multipart upload is aborted
const ABORT_INCOMPLETE_UPLOAD_DAYS: u32 = 7;
/// Max age of CORS preflight responses, in seconds
const CORS_MAX_AGE: u32 = 3000;

/// S3 bucket naming rules without dots, dots are rejected separately
static BUCKET_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]{1,61}[a-z0-9]$").expect("valid regex"));

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DatasetStackDescription {
    pub stack_id: String,
    pub region: String,
    /// Name of the dataset, e.g. "nz-imagery"
    pub dataset_name: String,
    /// Bucket where the data is stored
    pub bucket: BucketDescription,
    /// Bucket where S3 access logs are stored
    pub log_bucket: BucketDescription,
    /// SNS topic for S3 `object_created` events
    pub topic: TopicDescription,
    pub roles: Vec<RoleDescription>,
    pub outputs: Vec<StackOutput>,
}

impl DatasetStackDescription {
    pub fn role(&self, logical_id: &str) -> Option<&RoleDescription> {
        self.roles.iter().find(|role| role.logical_id == logical_id)
    }

    pub fn output(&self, key: &str) -> Option<&StackOutput> {
        self.outputs.iter().find(|output| output.key == key)
    }
}

pub struct DatasetStack;

impl DatasetStack {
    /// Describe the stack for one dataset.
    ///
    /// The log reader and data manager roles are only described when their
    /// context keys are set. When set, every ARN must be a valid role ARN.
    pub fn build<P>(
        provider: &P,
        stack_id: &str,
        region: &str,
        dataset_name: &str,
    ) -> Result<DatasetStackDescription, StackError>
    where
        P: ContextProvider + ?Sized,
    {
        validate_dataset_name(dataset_name)?;

        let log_bucket = log_bucket(dataset_name);
        let topic = object_created_topic(dataset_name);
        let bucket = data_bucket(dataset_name, &log_bucket, &topic);

        let mut outputs = vec![
            StackOutput::new("Bucket", json!(bucket.bucket_name)),
            StackOutput::new("BucketLog", json!(log_bucket.bucket_name)),
        ];
        let mut roles = Vec::new();

        match try_get_context_principal(provider, LOG_READER_ROLE_ARN)? {
            Some(principal) => {
                let role = RoleDescription::assumed_by("LogReader", &principal)
                    .with_role_name(format!("s3-{dataset_name}-log-read"))
                    .with_bucket_grant(&log_bucket, BucketAccess::Read);
                outputs.push(StackOutput::new("LogReaderArn", role.arn_output()));
                roles.push(role);
            }
            None => log::warn!(
                "Unable to create logging role for {} as \"{}\" is not set.",
                dataset_name,
                LOG_READER_ROLE_ARN
            ),
        }

        match try_get_context_principal(provider, DATA_MANAGER_ROLE_ARN)? {
            Some(principal) => {
                let role = RoleDescription::assumed_by("DataManager", &principal)
                    .with_role_name(format!("s3-{dataset_name}-data-manager"))
                    .with_bucket_grant(&bucket, BucketAccess::ReadWrite)
                    .with_bucket_grant(&log_bucket, BucketAccess::Read);
                outputs.push(StackOutput::new("DataManagerArn", role.arn_output()));
                roles.push(role);
            }
            None => log::warn!(
                "Unable to create data manager role for {} as \"{}\" is not set.",
                dataset_name,
                DATA_MANAGER_ROLE_ARN
            ),
        }

        log::info!(
            "Described dataset {} with {} roles as stack {}",
            dataset_name,
            roles.len(),
            stack_id
        );

        Ok(DatasetStackDescription {
            stack_id: stack_id.to_string(),
            region: region.to_string(),
            dataset_name: dataset_name.to_string(),
            bucket,
            log_bucket,
            topic,
            roles,
            outputs,
        })
    }
}

/// The dataset name becomes the data bucket name and the prefix of the log
/// bucket name, so both must be valid bucket names.
fn validate_dataset_name(name: &str) -> Result<(), StackError> {
    let invalid = |reason: &str| StackError::InvalidDatasetName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.contains('.') {
        return Err(invalid("must not contain \".\""));
    }
    if !BUCKET_NAME_RE.is_match(name) || !BUCKET_NAME_RE.is_match(&log_bucket_name(name)) {
        return Err(invalid(
            "must be 3-58 lowercase letters, digits or \"-\", starting and ending with a letter or digit",
        ));
    }
    Ok(())
}

fn log_bucket_name(dataset_name: &str) -> String {
    format!("{dataset_name}-logs")
}

fn log_bucket(dataset_name: &str) -> BucketDescription {
    let mut bucket = BucketDescription::new("Logs", &log_bucket_name(dataset_name));
    // Only logs can be written to this bucket
    bucket.access_control = Some(BucketAccessControl::LogDeliveryWrite);
    bucket.block_public_access = true;
    bucket.lifecycle_rules = vec![LifecycleRule {
        expiration_days: Some(LOG_EXPIRATION_DAYS),
        ..LifecycleRule::default()
    }];
    bucket
}

fn object_created_topic(dataset_name: &str) -> TopicDescription {
    // Any Lambda or SQS queue may listen to `object_created` events
    let statement = Statement::allow(vec!["sns:Subscribe".to_string(), "sns:Receive".to_string()])
        .with_principal(PolicyPrincipal::any())
        .with_condition(
            "StringEquals",
            "SNS:Protocol",
            vec!["sqs".to_string(), "lambda".to_string()],
        );

    TopicDescription {
        logical_id: "ObjectCreated".to_string(),
        topic_name: format!("{dataset_name}-object_created"),
        resource_policy: PolicyDocument::new(vec![statement]),
    }
}

fn data_bucket(
    dataset_name: &str,
    log_bucket: &BucketDescription,
    topic: &TopicDescription,
) -> BucketDescription {
    let mut bucket = BucketDescription::new("Data", dataset_name);
    bucket.versioned = true;
    bucket.removal_policy = RemovalPolicy::Retain;
    bucket.server_access_logs = Some(AccessLogs {
        bucket_logical_id: log_bucket.logical_id.clone(),
        prefix: format!("s3_{dataset_name}/"),
    });
    bucket.lifecycle_rules = vec![LifecycleRule {
        transitions: vec![Transition {
            storage_class: StorageClass::InfrequentAccess,
            transition_after_days: 0,
        }],
        noncurrent_version_expiration_days: Some(NONCURRENT_VERSION_EXPIRATION_DAYS),
        expired_object_delete_marker: true,
        abort_incomplete_multipart_upload_after_days: Some(ABORT_INCOMPLETE_UPLOAD_DAYS),
        ..LifecycleRule::default()
    }];
    bucket.cors = vec![CorsRule {
        max_age: CORS_MAX_AGE,
        allowed_headers: vec!["*".to_string()],
        allowed_methods: vec![HttpMethod::Get, HttpMethod::Head],
        allowed_origins: vec!["*".to_string()],
        exposed_headers: vec!["ETag".to_string(), "x-amz-meta-custom-header".to_string()],
    }];
    bucket.event_notifications = vec![EventNotification {
        event: EventType::ObjectCreated,
        topic_logical_id: topic.logical_id.clone(),
    }];
    bucket
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArnError;
    use rstest::rstest;
    use serde_json::Value;
    use std::collections::HashMap;

    const READER: &str = "arn:aws:iam::1234567890:role/LogReaderBastion";
    const MANAGER: &str = "arn:aws:iam::1234567890:role/DataManagerBastion";

    fn context(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    fn build(ctx: &HashMap<String, Value>, name: &str) -> Result<DatasetStackDescription, StackError> {
        DatasetStack::build(ctx, "OpenDataNzImagery", "ap-southeast-2", name)
    }

    #[test]
    fn test_resource_names() {
        let stack = build(&context(&[]), "nz-imagery").unwrap();
        assert_eq!(stack.bucket.bucket_name, "nz-imagery");
        assert_eq!(stack.log_bucket.bucket_name, "nz-imagery-logs");
        assert_eq!(stack.topic.topic_name, "nz-imagery-object_created");
        assert_eq!(
            stack.bucket.server_access_logs,
            Some(AccessLogs {
                bucket_logical_id: "Logs".into(),
                prefix: "s3_nz-imagery/".into()
            })
        );
        assert_eq!(stack.output("Bucket").unwrap().value, json!("nz-imagery"));
        assert_eq!(stack.output("BucketLog").unwrap().value, json!("nz-imagery-logs"));
    }

    #[test]
    fn test_bucket_settings() {
        let stack = build(&context(&[]), "nz-imagery").unwrap();

        assert!(stack.bucket.versioned);
        assert_eq!(stack.bucket.removal_policy, RemovalPolicy::Retain);
        let rule = &stack.bucket.lifecycle_rules[0];
        assert_eq!(rule.noncurrent_version_expiration_days, Some(30));
        assert_eq!(rule.abort_incomplete_multipart_upload_after_days, Some(7));
        assert!(rule.expired_object_delete_marker);
        assert_eq!(rule.transitions[0].transition_after_days, 0);
        assert_eq!(stack.bucket.cors[0].max_age, 3000);
        assert_eq!(stack.bucket.event_notifications[0].topic_logical_id, "ObjectCreated");

        assert!(stack.log_bucket.block_public_access);
        assert_eq!(
            stack.log_bucket.access_control,
            Some(BucketAccessControl::LogDeliveryWrite)
        );
        assert_eq!(stack.log_bucket.lifecycle_rules[0].expiration_days, Some(30));
    }

    #[test]
    fn test_topic_policy_limits_protocols() {
        let stack = build(&context(&[]), "nz-imagery").unwrap();
        let json = serde_json::to_value(&stack.topic).unwrap();
        let statement = &json["ResourcePolicy"]["Statement"][0];
        assert_eq!(statement["Principal"], json!({"AWS": "*"}));
        assert_eq!(
            statement["Condition"]["StringEquals"]["SNS:Protocol"],
            json!(["sqs", "lambda"])
        );
    }

    #[test]
    fn test_roles_skipped_without_context() {
        let stack = build(&context(&[]), "nz-imagery").unwrap();
        assert!(stack.roles.is_empty());
        assert!(stack.output("LogReaderArn").is_none());
        assert!(stack.output("DataManagerArn").is_none());
    }

    #[test]
    fn test_roles_from_context() {
        let ctx = context(&[
            (LOG_READER_ROLE_ARN, json!(READER)),
            (DATA_MANAGER_ROLE_ARN, json!([MANAGER, READER])),
        ]);
        let stack = build(&ctx, "nz-imagery").unwrap();

        let reader = stack.role("LogReader").unwrap();
        assert_eq!(reader.role_name.as_deref(), Some("s3-nz-imagery-log-read"));
        assert_eq!(reader.grants.len(), 1);
        assert_eq!(reader.grants[0].bucket_logical_id, "Logs");
        assert_eq!(reader.grants[0].access, BucketAccess::Read);

        let manager = stack.role("DataManager").unwrap();
        assert_eq!(manager.role_name.as_deref(), Some("s3-nz-imagery-data-manager"));
        assert_eq!(manager.grants[0].bucket_logical_id, "Data");
        assert_eq!(manager.grants[0].access, BucketAccess::ReadWrite);
        assert_eq!(manager.grants[1].bucket_logical_id, "Logs");
        let trust = serde_json::to_value(&manager.assume_role_policy).unwrap();
        assert_eq!(trust["Statement"][0]["Principal"]["AWS"], json!([MANAGER, READER]));

        assert_eq!(
            stack.output("DataManagerArn").unwrap().value,
            json!({"Fn::GetAtt": ["DataManager", "Arn"]})
        );
    }

    #[test]
    fn test_invalid_role_arn_fails_stack() {
        let ctx = context(&[(LOG_READER_ROLE_ARN, json!("arn:aws:iam::1:role/*"))]);
        let err = build(&ctx, "nz-imagery").unwrap_err();
        assert!(matches!(err, StackError::Arn(ArnError::Wildcard { .. })));
    }

    #[rstest]
    #[case("nz.imagery")]
    #[case("")]
    #[case("NZ-Imagery")]
    #[case("-imagery")]
    #[case("nz_imagery")]
    #[case("ab-cdefghijklmnopqrstuvwxyz-abcdefghijklmnopqrstuvwxyz-abcdef")]
    fn test_invalid_dataset_names(#[case] name: &str) {
        let err = build(&context(&[]), name).unwrap_err();
        assert!(
            matches!(err, StackError::InvalidDatasetName { .. }),
            "{name}: {err}"
        );
    }

    #[test]
    fn test_dot_reason() {
        let err = build(&context(&[]), "nz.imagery").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid dataset name \"nz.imagery\": must not contain \".\""
        );
    }
}
