//! Run a single AWS CLI command across several named profiles.
//!
//! Profiles come from the AWS CLI config file (`~/.aws/config` by default).
//! Each selected profile gets its own rendering of the command template, with
//! `{account_id}` and `{profile}` replaced, and its own `AWS_PROFILE` in the
//! child environment.

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod runner;
pub mod scope;
pub mod template;

pub use config::Profile;
pub use error::{ConfigError, InvocationError, TemplateError};
pub use executor::{BatchReport, Executor, ProfileRun};
pub use runner::{CommandOutput, CommandRunner, ProcessRunner};
pub use scope::Scope;
pub use template::{CommandTemplate, Invocation};
