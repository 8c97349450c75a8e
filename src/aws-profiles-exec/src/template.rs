//! Command templates and per-profile placeholder substitution.

use crate::config::Profile;
use crate::error::TemplateError;
use std::collections::BTreeMap;
use std::fmt;

pub const AWS_PROGRAM: &str = "aws";
pub const AWS_PROFILE_ENV: &str = "AWS_PROFILE";
pub const ACCOUNT_ID_PLACEHOLDER: &str = "{account_id}";
pub const PROFILE_PLACEHOLDER: &str = "{profile}";

/// A whitespace-tokenized command whose first token is always `aws`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    tokens: Vec<String>,
}

/// A command rendered for one profile, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
}

impl CommandTemplate {
    /// Tokenizes `text` on whitespace and checks that it runs `aws`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Empty`] for a blank command and
    /// [`TemplateError::NotAws`] when the first token is anything but `aws`.
    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        let tokens: Vec<String> = text.split_whitespace().map(String::from).collect();

        match tokens.first() {
            None => Err(TemplateError::Empty),
            Some(first) if first != AWS_PROGRAM => Err(TemplateError::NotAws {
                first: first.clone(),
            }),
            Some(_) => Ok(Self { tokens }),
        }
    }

    #[cfg(test)]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Substitutes the profile's values into a copy of the tokens.
    pub fn render(&self, profile: &Profile) -> Invocation {
        let mut rendered = self.tokens.iter().map(|token| substitute(token, profile));
        let program = rendered.next().unwrap_or_else(|| AWS_PROGRAM.to_string());
        let args = rendered.collect();

        let mut env = BTreeMap::new();
        env.insert(AWS_PROFILE_ENV.to_string(), profile.name.clone());

        Invocation { program, args, env }
    }
}

fn substitute(token: &str, profile: &Profile) -> String {
    token
        .replace(ACCOUNT_ID_PLACEHOLDER, &profile.sso_account_id)
        .replace(PROFILE_PLACEHOLDER, &profile.name)
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, account_id: &str) -> Profile {
        Profile {
            sso_account_id: account_id.to_string(),
            ..Profile::new(name)
        }
    }

    #[test]
    fn test_rejects_non_aws_command() {
        assert_eq!(
            CommandTemplate::parse("ls -la"),
            Err(TemplateError::NotAws {
                first: "ls".to_string()
            })
        );
        assert!(CommandTemplate::parse("awscli s3 ls").is_err());
        assert!(CommandTemplate::parse("AWS s3 ls").is_err());
    }

    #[test]
    fn test_rejects_empty_command() {
        assert_eq!(CommandTemplate::parse("   "), Err(TemplateError::Empty));
    }

    #[test]
    fn test_tokenizes_on_any_whitespace() {
        let template = CommandTemplate::parse("  aws\ts3   ls ").unwrap();
        assert_eq!(template.tokens(), ["aws", "s3", "ls"]);
        assert_eq!(template.to_string(), "aws s3 ls");
    }

    #[test]
    fn test_render_replaces_every_occurrence() {
        let template = CommandTemplate::parse(
            "aws s3 ls s3://{profile}-{account_id}-logs/{account_id} --profile {profile}",
        )
        .unwrap();
        let invocation = template.render(&profile("dev", "111111111111"));

        assert_eq!(invocation.program, "aws");
        assert_eq!(
            invocation.args,
            [
                "s3",
                "ls",
                "s3://dev-111111111111-logs/111111111111",
                "--profile",
                "dev"
            ]
        );
    }

    #[test]
    fn test_render_does_not_leak_between_profiles() {
        let template = CommandTemplate::parse("aws sts get-caller-identity --profile {profile}").unwrap();

        let dev = template.render(&profile("dev", "111111111111"));
        let prod = template.render(&profile("prod", "222222222222"));

        assert_eq!(dev.to_string(), "aws sts get-caller-identity --profile dev");
        assert_eq!(prod.to_string(), "aws sts get-caller-identity --profile prod");
        assert_eq!(template.to_string(), "aws sts get-caller-identity --profile {profile}");
    }

    #[test]
    fn test_render_sets_aws_profile_env() {
        let template = CommandTemplate::parse("aws s3 ls").unwrap();
        let invocation = template.render(&profile("qa", ""));
        assert_eq!(invocation.env.get(AWS_PROFILE_ENV).map(String::as_str), Some("qa"));
        assert_eq!(invocation.env.len(), 1);
    }

    #[test]
    fn test_missing_account_id_renders_empty() {
        let template = CommandTemplate::parse("aws x --id={account_id}").unwrap();
        let invocation = template.render(&profile("qa", ""));
        assert_eq!(invocation.args, ["x", "--id="]);
    }
}
