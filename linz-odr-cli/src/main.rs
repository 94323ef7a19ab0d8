use anyhow::{Context, Result};
use clap::Parser;
use linz_odr_core::{synth, title_case, validate_role_arn, SynthConfig};
use log::LevelFilter;

mod cli;

use cli::{Cli, Commands, SynthArgs, TitleCaseArgs, ValidateArnArgs};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::ValidateArn(args) => validate_arns(args),
        Commands::TitleCase(args) => title_case_names(args),
        Commands::Synth(args) => synth_app(args),
    };

    if let Err(err) = result {
        if cli.verbose > 0 {
            eprintln!("Error: {err:?}");
        } else {
            eprintln!("Error: {}", format_error_chain(&err));
        }
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins over `-v` when set
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn format_error_chain(err: &anyhow::Error) -> String {
    let mut out = err.to_string();
    for cause in err.chain().skip(1) {
        out.push_str(": ");
        out.push_str(&cause.to_string());
    }
    out
}

fn validate_arns(args: ValidateArnArgs) -> Result<()> {
    for arn in &args.arns {
        let components = validate_role_arn(arn)?;
        log::info!("{} is a valid role ARN", arn);
        println!("{}", serde_json::to_string(&components)?);
    }
    Ok(())
}

fn title_case_names(args: TitleCaseArgs) -> Result<()> {
    for name in &args.names {
        println!("{}", title_case(name));
    }
    Ok(())
}

fn synth_app(args: SynthArgs) -> Result<()> {
    let config = SynthConfig {
        context_file: args.context_file,
        context_overrides: args.context,
        datasets: args.datasets,
        region: args.region,
    };
    let app = synth(&config).context("Failed to describe the open data stacks")?;
    println!("{}", serde_json::to_string_pretty(&app)?);
    Ok(())
}
