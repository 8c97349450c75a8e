//! Runs a command template once per in-scope profile, in file order.

use crate::config::Profile;
use crate::error::InvocationError;
use crate::runner::{CommandOutput, CommandRunner};
use crate::scope::Scope;
use crate::template::CommandTemplate;
use log::{error, info, warn};

const SEPARATOR: &str = "--------------------------------------------------";

#[derive(Debug)]
pub enum RunOutcome {
    Succeeded(CommandOutput),
    Failed(InvocationError),
    /// Rendered but not run because of `--dry-run`.
    Planned,
}

#[derive(Debug)]
pub struct ProfileRun {
    pub profile: String,
    pub account_id: String,
    pub command: String,
    pub outcome: RunOutcome,
}

impl ProfileRun {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, RunOutcome::Failed(_))
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub runs: Vec<ProfileRun>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.runs
            .iter()
            .filter(|r| matches!(r.outcome, RunOutcome::Succeeded(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.runs.iter().filter(|r| r.is_failure()).count()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Profiles whose name is in `scope`, in the order they were parsed.
pub fn select<'a>(profiles: &'a [Profile], scope: &Scope) -> Vec<&'a Profile> {
    profiles.iter().filter(|p| scope.contains(&p.name)).collect()
}

pub struct Executor<R> {
    template: CommandTemplate,
    runner: R,
    dry_run: bool,
}

impl<R: CommandRunner> Executor<R> {
    pub fn new(template: CommandTemplate, runner: R) -> Self {
        Self {
            template,
            runner,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[cfg(test)]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Runs the template for every selected profile, one at a time.
    ///
    /// A failing profile is logged and recorded; later profiles still run.
    pub async fn run(&self, profiles: &[Profile], scope: &Scope) -> BatchReport {
        let selected = select(profiles, scope);

        info!("{SEPARATOR}");
        info!("AWS CLI Profiles Execution");
        info!("AWS CLI Command: {}", self.template);
        info!("Current Context: {scope}");
        info!("{SEPARATOR}");

        if scope.is_empty() {
            warn!("No profiles in scope, nothing to run");
        }

        for name in scope.names() {
            if !profiles.iter().any(|p| &p.name == name) {
                warn!("Profile {name} is not defined in the AWS config file");
            }
        }

        for profile in &selected {
            log_profile(profile);
        }

        let mut report = BatchReport::default();
        for profile in selected {
            report.runs.push(self.run_profile(profile).await);
        }

        info!(
            "Finished: {} succeeded, {} failed",
            report.succeeded(),
            report.failed()
        );
        report
    }

    async fn run_profile(&self, profile: &Profile) -> ProfileRun {
        let invocation = self.template.render(profile);
        let command = invocation.to_string();

        let outcome = if self.dry_run {
            info!("Would execute for profile {}: {command}", profile.name);
            RunOutcome::Planned
        } else {
            info!("Executing command for profile: {}", profile.name);
            match self.runner.run(&invocation).await {
                Ok(output) => {
                    info!(
                        "Output for profile {} (Account ID: {}):\n{}",
                        profile.name, profile.sso_account_id, output.output
                    );
                    RunOutcome::Succeeded(output)
                }
                Err(e) => {
                    error!("Profile {}: {e}", profile.name);
                    if let Some(output) = e.output() {
                        error!("{output}");
                    }
                    RunOutcome::Failed(e)
                }
            }
        };

        ProfileRun {
            profile: profile.name.clone(),
            account_id: profile.sso_account_id.clone(),
            command,
            outcome,
        }
    }
}

/// Logs every field of a profile followed by a separator line.
pub fn log_profile(profile: &Profile) {
    for line in profile.to_string().lines() {
        info!("{line}");
    }
    info!("{SEPARATOR}");
}
