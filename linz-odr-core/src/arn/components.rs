//! Structural ARN parsing using the slash separated resource format
//!
//! `arn:<partition>:<service>:<region>:<account>:<resource>/<resource-name>`
//!
//! Colons after the sixth component are part of the resource name, so
//! `arn:aws:iam::1:role/a:b` has the resource name `a:b`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ArnParseError;

const ARN_PREFIX: &str = "arn";

/// The components of an ARN split with a slash separated resource name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArnComponents {
    /// Partition, e.g. `aws` or `aws-cn`
    pub partition: String,
    /// Service namespace, e.g. `iam`
    pub service: String,
    /// Region, empty for global services such as IAM
    pub region: String,
    /// Account id
    pub account: String,
    /// Resource type, e.g. `role`
    pub resource: String,
    /// Resource name, e.g. `AccountAdminRole`
    pub resource_name: String,
}

impl ArnComponents {
    /// Split an ARN into its components without checking which service or
    /// resource type it refers to.
    pub fn parse(arn: &str) -> Result<Self, ArnParseError> {
        let components: Vec<&str> = arn.split(':').collect();

        let [prefix, partition, service, region, account, resource_part, rest @ ..] =
            components.as_slice()
        else {
            return Err(ArnParseError::Shape {
                components: components.len(),
            });
        };
        if *prefix != ARN_PREFIX {
            return Err(ArnParseError::Shape {
                components: components.len(),
            });
        }
        if partition.is_empty() {
            return Err(ArnParseError::MissingPartition);
        }
        if service.is_empty() {
            return Err(ArnParseError::MissingService);
        }
        if resource_part.is_empty() {
            return Err(ArnParseError::MissingResource);
        }

        let Some((resource, name)) = resource_part.split_once('/') else {
            return Err(ArnParseError::MissingResourceSeparator {
                resource: (*resource_part).to_string(),
            });
        };

        if name.is_empty() {
            return Err(ArnParseError::MissingResourceName {
                resource: (*resource_part).to_string(),
            });
        }
        let mut resource_name = name.to_string();
        for segment in rest {
            resource_name.push(':');
            resource_name.push_str(segment);
        }

        Ok(Self {
            partition: (*partition).to_string(),
            service: (*service).to_string(),
            region: (*region).to_string(),
            account: (*account).to_string(),
            resource: resource.to_string(),
            resource_name,
        })
    }
}

impl FromStr for ArnComponents {
    type Err = ArnParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ArnComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{ARN_PREFIX}:{}:{}:{}:{}:{}/{}",
            self.partition, self.service, self.region, self.account, self.resource, self.resource_name
        )
    }
}
