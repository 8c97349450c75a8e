use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Home directory not found")]
    HomeNotFound,
    #[error("Failed to read AWS config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Invalid command. The command is empty")]
    Empty,
    #[error("Invalid command. The first item in the command must be \"aws\", got \"{first}\"")]
    NotAws { first: String },
}

/// Failure of a single profile's command. Never fatal to the batch.
#[derive(Error, Debug)]
pub enum InvocationError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Command exited with {status}")]
    Failed { status: ExitStatus, output: String },
    #[error("Command timed out after {}s", .after.as_secs())]
    TimedOut { after: Duration },
    #[error("Failed to read command output: {0}")]
    Io(#[from] std::io::Error),
}

impl InvocationError {
    /// Output captured before the failure, if there was any.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Failed { output, .. } if !output.is_empty() => Some(output),
            _ => None,
        }
    }
}
