//! Parser for the `[profile <name>]` sections of the AWS CLI config file.

use crate::error::ConfigError;
use dirs::home_dir;
use std::env;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const AWS_CONFIG_FILE_ENV: &str = "AWS_CONFIG_FILE";

const PROFILE_HEADER_PREFIX: &str = "[profile ";

type Result<T> = std::result::Result<T, ConfigError>;

/// One named profile. Keys missing from the section stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub sso_start_url: String,
    pub sso_region: String,
    pub sso_account_id: String,
    pub sso_role_name: String,
    pub region: String,
    pub output: String,
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Applies a `key = value` pair. Returns false for keys we don't track.
    fn set(&mut self, key: &str, value: &str) -> bool {
        let field = match key {
            "sso_start_url" => &mut self.sso_start_url,
            "sso_region" => &mut self.sso_region,
            "sso_account_id" => &mut self.sso_account_id,
            "sso_role_name" => &mut self.sso_role_name,
            "region" => &mut self.region,
            "output" => &mut self.output,
            _ => return false,
        };
        *field = value.to_string();
        true
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Profile: {}", self.name)?;
        writeln!(f, "SSOStartUrl: {}", self.sso_start_url)?;
        writeln!(f, "SSORegion: {}", self.sso_region)?;
        writeln!(f, "SSOAccountId: {}", self.sso_account_id)?;
        writeln!(f, "SSORoleName: {}", self.sso_role_name)?;
        writeln!(f, "Region: {}", self.region)?;
        write!(f, "Output: {}", self.output)
    }
}

enum ParseState {
    Outside,
    InProfile(Profile),
}

impl ParseState {
    /// Leaves the current section, emitting the profile being built if any.
    fn close(self, profiles: &mut Vec<Profile>) {
        if let ParseState::InProfile(profile) = self {
            profiles.push(profile);
        }
    }
}

fn is_skippable(line: &str) -> bool {
    line.is_empty() || line.starts_with('#') || line.starts_with(';')
}

/// Name from a `[profile <name>]` header. A missing `]` keeps the remainder.
fn profile_name(header: &str) -> &str {
    let rest = header.strip_prefix(PROFILE_HEADER_PREFIX).unwrap_or(header);
    rest.strip_suffix(']').unwrap_or(rest).trim()
}

/// Parses config text into profiles, in file order.
///
/// Lines before the first `[profile ...]` header, lines without `=` and
/// unknown keys are ignored. Other sections such as `[default]` or
/// `[sso-session ...]` end the current profile and their keys are skipped,
/// unlike a plain line-by-line reader that would fold them into the profile
/// above. A `[profile ]` header with no name is skipped the same way.
pub fn parse_str(content: &str) -> Vec<Profile> {
    let mut profiles = Vec::new();
    let mut state = ParseState::Outside;

    for line in content.lines() {
        let line = line.trim();

        if is_skippable(line) {
            continue;
        }

        if line.starts_with(PROFILE_HEADER_PREFIX) {
            state.close(&mut profiles);
            let name = profile_name(line);
            state = if name.is_empty() {
                log::debug!("Skipping profile header without a name: {line:?}");
                ParseState::Outside
            } else {
                ParseState::InProfile(Profile::new(name))
            };
            continue;
        }

        if line.starts_with('[') {
            state.close(&mut profiles);
            state = ParseState::Outside;
            continue;
        }

        if let ParseState::InProfile(profile) = &mut state {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if !profile.set(key, value.trim()) {
                log::debug!("Ignoring unknown key {key:?} in profile {}", profile.name);
            }
        }
    }

    state.close(&mut profiles);
    profiles
}

/// Reads and parses the config file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] if the file cannot be opened or read.
pub fn parse_file(path: &Path) -> Result<Vec<Profile>> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_str(&content))
}

/// Picks the config file: explicit override, then `$AWS_CONFIG_FILE`, then
/// `~/.aws/config`.
///
/// # Errors
///
/// Returns [`ConfigError::HomeNotFound`] when falling back to the home
/// directory and it cannot be determined.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    pick_config_path(explicit, env::var_os(AWS_CONFIG_FILE_ENV), home_dir())
}

fn pick_config_path(
    explicit: Option<&Path>,
    env_value: Option<OsString>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Some(path) = env_value.filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }

    let home = home.ok_or(ConfigError::HomeNotFound)?;
    Ok(home.join(".aws").join("config"))
}
