//! Entry points used by the CLI

use std::path::PathBuf;

use crate::context::Context;
use crate::error::OdrResult;
use crate::stacks::{AppDescription, OpenDataApp, DEFAULT_REGION};

/// Configuration for describing the app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthConfig {
    /// `cdk.json` style file to read context from
    pub context_file: Option<PathBuf>,
    /// `key=value` context overrides, applied after the context file
    pub context_overrides: Vec<String>,
    /// Datasets to describe, read from the `datasets` context key when empty
    pub datasets: Vec<String>,
    pub region: String,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            context_file: None,
            context_overrides: Vec::new(),
            datasets: Vec::new(),
            region: DEFAULT_REGION.to_string(),
        }
    }
}

/// Build the context from the configured file and overrides
pub fn load_context(config: &SynthConfig) -> OdrResult<Context> {
    let mut context = match &config.context_file {
        Some(path) => Context::from_cdk_json_file(path)?,
        None => Context::new(),
    };
    for pair in &config.context_overrides {
        context = context.with_override(pair)?;
    }
    Ok(context)
}

/// Describe every stack of the open data app
pub fn synth(config: &SynthConfig) -> OdrResult<AppDescription> {
    let context = load_context(config)?;
    log::info!(
        "Describing stacks in {} from {} context values",
        config.region,
        context.len()
    );
    Ok(OpenDataApp::synth(&context, &config.datasets, &config.region)?)
}
