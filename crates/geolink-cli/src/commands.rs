use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use geolink_cli::config::GeolinkConfig;
use geolink_cli::pipeline::{self, LinkOutcome, LinkRequest, ValidateOutcome};
use geolink_cli::summary::{
    print_clean_summary, print_link_summary, print_review_summary, print_status,
};

use crate::cli::{Cli, LinkArgs};

const PROGRESS_TEMPLATE: &str = "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}";

pub fn load_config(cli: &Cli) -> Result<GeolinkConfig> {
    let mut config = GeolinkConfig::load(cli.config.as_deref())?;
    if let Some(work_dir) = &cli.work_dir {
        config.paths.work_dir = work_dir.clone();
    }
    Ok(config)
}

pub fn run_clean(config: &GeolinkConfig) -> Result<()> {
    let outcome = pipeline::clean(config)?;
    print_clean_summary(&outcome);
    Ok(())
}

pub fn run_link(config: &GeolinkConfig, args: &LinkArgs) -> Result<LinkOutcome> {
    let mut oracle_config = config.oracle.clone();
    if let Some(kind) = args.oracle {
        oracle_config.kind = kind.into();
    }
    let oracle = oracle_config.build()?;
    let request = LinkRequest {
        countries: args.countries.clone(),
        overwrite: args.overwrite,
        layout: args.layout.into(),
    };

    let progress = ProgressBar::new(0);
    progress.set_style(ProgressStyle::with_template(PROGRESS_TEMPLATE)?.progress_chars("=> "));
    let outcome = pipeline::link(config, oracle.as_ref(), &request, &progress)?;
    print_link_summary(&outcome);
    Ok(outcome)
}

pub fn run_validate(config: &GeolinkConfig) -> Result<ValidateOutcome> {
    let outcome = pipeline::validate(config)?;
    print_review_summary(&outcome);
    Ok(outcome)
}

/// Runs every stage. Validation still runs when some countries failed, so the
/// countries that did complete are reported.
pub fn run_all(config: &GeolinkConfig, args: &LinkArgs) -> Result<LinkOutcome> {
    run_clean(config)?;
    let outcome = run_link(config, args)?;
    run_validate(config)?;
    Ok(outcome)
}

pub fn run_status(config: &GeolinkConfig) -> Result<()> {
    let rows = pipeline::status(config)?;
    print_status(&rows);
    Ok(())
}
