//! Console access stack: roles in another account may log into this account as
//! a read only user (billing, metrics) or as an account admin.

use serde::Serialize;

use super::resources::{RoleDescription, StackOutput};
use crate::context::ContextProvider;
use crate::error::StackError;
use crate::principal::try_get_context_principal;

/// Context key holding the role(s) allowed to assume the read only console role
pub const CONSOLE_READ_ONLY_ROLE_ARN: &str = "console-read-only-role-arn";
/// Context key holding the role(s) allowed to assume the admin console role
pub const CONSOLE_ADMIN_ROLE_ARN: &str = "console-admin-role-arn";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ConsoleStackDescription {
    pub stack_id: String,
    pub region: String,
    pub roles: Vec<RoleDescription>,
    pub outputs: Vec<StackOutput>,
}

pub struct ConsoleStack;

impl ConsoleStack {
    pub fn build<P>(
        provider: &P,
        stack_id: &str,
        region: &str,
    ) -> Result<ConsoleStackDescription, StackError>
    where
        P: ContextProvider + ?Sized,
    {
        let mut roles = Vec::new();
        let mut outputs = Vec::new();

        let console_roles = [
            ("ConsoleReadOnly", CONSOLE_READ_ONLY_ROLE_ARN, "ReadOnlyAccess"),
            ("ConsoleAdmin", CONSOLE_ADMIN_ROLE_ARN, "AdministratorAccess"),
        ];
        for (logical_id, context_key, managed_policy) in console_roles {
            let Some(principal) = try_get_context_principal(provider, context_key)? else {
                log::debug!("Skipping {} as \"{}\" is not set", logical_id, context_key);
                continue;
            };
            let role = RoleDescription::assumed_by(logical_id, &principal)
                .with_aws_managed_policy(managed_policy);
            outputs.push(StackOutput::new(&format!("{logical_id}Arn"), role.arn_output()));
            roles.push(role);
        }

        Ok(ConsoleStackDescription {
            stack_id: stack_id.to_string(),
            region: region.to_string(),
            roles,
            outputs,
        })
    }
}
