use crate::config::{self, Profile};
use crate::executor::{self, BatchReport, Executor};
use crate::logging::DEFAULT_LOG_FILE;
use crate::runner::ProcessRunner;
use crate::scope::Scope;
use crate::template::CommandTemplate;
use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "aws-profiles-exec",
    author = "Tim Mattison",
    version,
    about = "Run one AWS CLI command across several profiles from ~/.aws/config",
    long_about = "aws-profiles-exec runs the same AWS CLI command once for each selected profile in your AWS config file. \
{account_id} and {profile} in the command are replaced with each profile's SSO account ID and name, and AWS_PROFILE is set for every run. \
Run it without arguments to list the available profiles.",
    after_help = "Examples:
  aws-profiles-exec \"aws s3 ls\" \"dev,qa\"
  aws-profiles-exec \"aws sts get-caller-identity --profile {profile}\" prod
  aws-profiles-exec --dry-run \"aws s3 ls s3://logs-{account_id}\" \"dev,qa,prod\""
)]
pub struct Args {
    /// AWS CLI command to run; the first word must be "aws"
    #[arg(value_name = "COMMAND")]
    pub command: Option<String>,

    /// Comma-separated list of profiles to run against (e.g. dev,qa,prod)
    #[arg(value_name = "PROFILES")]
    pub profiles: Option<String>,

    /// AWS config file to read (default: $AWS_CONFIG_FILE or ~/.aws/config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// File that every log line is appended to
    #[arg(long = "log-file", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Kill a profile's command if it runs longer than this many seconds
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Print the resolved command for each profile without running it
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Debug)]
pub enum Outcome {
    /// Arguments were missing; usage and the profile list were shown.
    Usage,
    Completed(BatchReport),
}

/// Loads profiles and either shows usage or runs the batch.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or the command does
/// not start with `aws`. Per-profile failures are reported in the
/// [`BatchReport`] instead.
pub async fn run(args: Args) -> Result<Outcome> {
    let config_path = config::resolve_config_path(args.config.as_deref())?;
    let profiles = config::parse_file(&config_path).context("Error reading AWS config file")?;

    let (Some(command), Some(scope)) = (args.command, args.profiles) else {
        print_usage(&profiles);
        return Ok(Outcome::Usage);
    };

    let template = CommandTemplate::parse(&command)?;
    let runner = ProcessRunner::new().with_timeout(args.timeout.map(Duration::from_secs));

    let report = Executor::new(template, runner)
        .dry_run(args.dry_run)
        .run(&profiles, &Scope::parse(&scope))
        .await;

    Ok(Outcome::Completed(report))
}

fn print_usage(profiles: &[Profile]) {
    error!("Usage: aws-profiles-exec [AWS CLI command] [profile1,profile2,...]");
    error!("Example: aws-profiles-exec \"aws s3 ls\" \"dev,qa\"");
    error!("Available profiles:");
    if profiles.is_empty() {
        info!("No profiles found");
    }
    for profile in profiles {
        executor::log_profile(profile);
    }
}
