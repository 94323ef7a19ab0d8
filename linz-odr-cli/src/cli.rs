use clap::{Args, Parser, Subcommand};
use linz_odr_core::stacks::DEFAULT_REGION;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "linz-odr",
    version,
    about = "LINZ open data registry infrastructure",
    long_about = "Validates cross-account role ARNs, formats resource names and describes the open data stacks as JSON.",
    after_help = "EXAMPLES:\n  linz-odr validate-arn arn:aws:iam::123456789012:role/AccountAdminRole\n  linz-odr title-case nz-imagery\n  linz-odr synth --context-file cdk.json --dataset nz-imagery\n  linz-odr synth -c log-reader-role-arn=arn:aws:iam::123456789012:role/LogReader --dataset nz-elevation\n"
)]
pub struct Cli {
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count, help = "Increase verbosity (-v, -vv)")]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Validate that each argument is an IAM role ARN")]
    ValidateArn(ValidateArnArgs),
    #[command(about = "Convert names into title case resource name fragments")]
    TitleCase(TitleCaseArgs),
    #[command(about = "Describe the open data stacks as JSON")]
    Synth(SynthArgs),
}

#[derive(Args, Debug)]
pub struct ValidateArnArgs {
    #[arg(required = true, help = "Role ARNs to validate")]
    pub arns: Vec<String>,
}

#[derive(Args, Debug)]
pub struct TitleCaseArgs {
    #[arg(required = true, help = "Names to convert")]
    pub names: Vec<String>,
}

#[derive(Args, Debug)]
pub struct SynthArgs {
    #[arg(long, env = "ODR_CONTEXT_FILE", help = "cdk.json style file to read context from")]
    pub context_file: Option<PathBuf>,
    #[arg(
        short = 'c',
        long = "context",
        value_name = "KEY=VALUE",
        help = "Context override, may be repeated"
    )]
    pub context: Vec<String>,
    #[arg(
        short = 'd',
        long = "dataset",
        value_name = "NAME",
        help = "Dataset to describe, may be repeated (default: the \"datasets\" context value)"
    )]
    pub datasets: Vec<String>,
    #[arg(long, env = "ODR_REGION", default_value = DEFAULT_REGION, help = "Region to describe the stacks in")]
    pub region: String,
}
