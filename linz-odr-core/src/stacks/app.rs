//! The open data app: one console stack plus one stack per dataset.

use std::collections::HashSet;

use serde::Serialize;

use super::console::{ConsoleStack, ConsoleStackDescription};
use super::dataset::{DatasetStack, DatasetStackDescription};
use crate::arn::lookup::lookup;
use crate::context::ContextProvider;
use crate::error::StackError;
use crate::names::title_case;

/// Id of the app, every stack id starts with it
pub const APP_ID: &str = "OpenData";
/// Region stacks are described in unless told otherwise
pub const DEFAULT_REGION: &str = "ap-southeast-2";
/// Context key listing dataset names when none are given explicitly
pub const DATASETS_CONTEXT_KEY: &str = "datasets";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "Kind")]
pub enum StackDescription {
    Console(ConsoleStackDescription),
    Dataset(DatasetStackDescription),
}

impl StackDescription {
    pub fn stack_id(&self) -> &str {
        match self {
            Self::Console(stack) => &stack.stack_id,
            Self::Dataset(stack) => &stack.stack_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct AppDescription {
    pub app_id: String,
    pub stacks: Vec<StackDescription>,
}

pub struct OpenDataApp;

impl OpenDataApp {
    /// Stack id of the dataset stack, e.g. `OpenDataNzImagery`
    pub fn dataset_stack_id(dataset_name: &str) -> String {
        format!("{APP_ID}{}", title_case(dataset_name))
    }

    /// Describe every stack of the app.
    ///
    /// When `datasets` is empty the dataset names are read from the
    /// `datasets` context key.
    pub fn synth<P>(
        provider: &P,
        datasets: &[String],
        region: &str,
    ) -> Result<AppDescription, StackError>
    where
        P: ContextProvider + ?Sized,
    {
        let datasets = if datasets.is_empty() {
            context_datasets(provider)?
        } else {
            datasets.to_vec()
        };

        let mut stacks = vec![StackDescription::Console(ConsoleStack::build(
            provider,
            &format!("{APP_ID}Console"),
            region,
        )?)];

        let mut seen = HashSet::new();
        for dataset in &datasets {
            if !seen.insert(dataset.as_str()) {
                return Err(StackError::DuplicateDataset {
                    name: dataset.clone(),
                });
            }
            let stack_id = Self::dataset_stack_id(dataset);
            stacks.push(StackDescription::Dataset(DatasetStack::build(
                provider, &stack_id, region, dataset,
            )?));
        }

        if datasets.is_empty() {
            log::warn!("No datasets configured, only the console stack was described");
        }

        Ok(AppDescription {
            app_id: APP_ID.to_string(),
            stacks,
        })
    }
}

fn context_datasets<P>(provider: &P) -> Result<Vec<String>, StackError>
where
    P: ContextProvider + ?Sized,
{
    let Some(value) = lookup(provider, DATASETS_CONTEXT_KEY) else {
        return Ok(Vec::new());
    };
    let invalid = || StackError::InvalidDatasetList {
        key: DATASETS_CONTEXT_KEY.to_string(),
        found: value.to_string(),
    };

    value
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|name| name.as_str().map(str::to_string).ok_or_else(invalid))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::collections::HashMap;

    #[test]
    fn test_dataset_stack_id() {
        assert_eq!(OpenDataApp::dataset_stack_id("nz-imagery"), "OpenDataNzImagery");
        assert_eq!(
            OpenDataApp::dataset_stack_id("nz-coastlines-and-islands"),
            "OpenDataNzCoastlinesAndIslands"
        );
    }

    #[test]
    fn test_synth_explicit_datasets() {
        let ctx: HashMap<String, Value> = HashMap::new();
        let app = OpenDataApp::synth(
            &ctx,
            &["nz-imagery".to_string(), "nz-elevation".to_string()],
            DEFAULT_REGION,
        )
        .unwrap();

        let ids: Vec<&str> = app.stacks.iter().map(StackDescription::stack_id).collect();
        assert_eq!(
            ids,
            ["OpenDataConsole", "OpenDataNzImagery", "OpenDataNzElevation"]
        );
    }

    #[test]
    fn test_synth_datasets_from_context() {
        let mut ctx: HashMap<String, Value> = HashMap::new();
        ctx.insert(DATASETS_CONTEXT_KEY.into(), json!(["nz-imagery"]));

        let app = OpenDataApp::synth(&ctx, &[], DEFAULT_REGION).unwrap();
        assert_eq!(app.stacks.len(), 2);
        let json = serde_json::to_value(&app).unwrap();
        assert_eq!(json["AppId"], "OpenData");
        assert_eq!(json["Stacks"][0]["Kind"], "Console");
        assert_eq!(json["Stacks"][1]["Kind"], "Dataset");
        assert_eq!(json["Stacks"][1]["Region"], "ap-southeast-2");
        assert_eq!(json["Stacks"][1]["Bucket"]["BucketName"], "nz-imagery");
    }

    #[test]
    fn test_explicit_datasets_override_context() {
        let mut ctx: HashMap<String, Value> = HashMap::new();
        ctx.insert(DATASETS_CONTEXT_KEY.into(), json!(["nz-imagery"]));

        let app = OpenDataApp::synth(&ctx, &["nz-elevation".to_string()], "us-west-2").unwrap();
        assert_eq!(app.stacks[1].stack_id(), "OpenDataNzElevation");
    }

    #[test]
    fn test_no_datasets() {
        let ctx: HashMap<String, Value> = HashMap::new();
        let app = OpenDataApp::synth(&ctx, &[], DEFAULT_REGION).unwrap();
        assert_eq!(app.stacks.len(), 1);
    }

    #[test]
    fn test_duplicate_datasets() {
        let ctx: HashMap<String, Value> = HashMap::new();
        let err = OpenDataApp::synth(
            &ctx,
            &["nz-imagery".to_string(), "nz-imagery".to_string()],
            DEFAULT_REGION,
        )
        .unwrap_err();
        assert!(matches!(err, StackError::DuplicateDataset { name } if name == "nz-imagery"));
    }

    #[test]
    fn test_invalid_dataset_list() {
        let mut ctx: HashMap<String, Value> = HashMap::new();
        ctx.insert(DATASETS_CONTEXT_KEY.into(), json!("nz-imagery"));
        let err = OpenDataApp::synth(&ctx, &[], DEFAULT_REGION).unwrap_err();
        assert!(matches!(err, StackError::InvalidDatasetList { .. }));

        ctx.insert(DATASETS_CONTEXT_KEY.into(), json!(["nz-imagery", 1]));
        let err = OpenDataApp::synth(&ctx, &[], DEFAULT_REGION).unwrap_err();
        assert!(matches!(err, StackError::InvalidDatasetList { .. }));
    }
}
