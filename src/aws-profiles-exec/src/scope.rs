//! The set of profile names a run is allowed to touch.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    names: Vec<String>,
}

impl Scope {
    /// Builds a scope from a comma-separated list such as `"dev,qa,prod"`.
    ///
    /// Names are trimmed and empty entries dropped, so `""` selects nothing.
    pub fn parse(list: &str) -> Self {
        Self::from_names(list.split(','))
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scope = Self::default();
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() && !scope.contains(name) {
                scope.names.push(name.to_string());
            }
        }
        scope
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.names.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_separated() {
        let scope = Scope::parse("dev,prod");
        assert_eq!(scope.names(), ["dev", "prod"]);
        assert!(scope.contains("dev"));
        assert!(scope.contains("prod"));
        assert!(!scope.contains("qa"));
    }

    #[test]
    fn test_empty_string_selects_nothing() {
        let scope = Scope::parse("");
        assert!(scope.is_empty());
        assert!(!scope.contains(""));
    }

    #[test]
    fn test_trims_and_dedups() {
        let scope = Scope::parse(" dev , ,prod,dev,");
        assert_eq!(scope.names(), ["dev", "prod"]);
    }

    #[test]
    fn test_membership_is_exact() {
        let scope = Scope::parse("dev");
        assert!(!scope.contains("Dev"));
        assert!(!scope.contains("dev2"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Scope::parse("dev,qa").to_string(), "[dev qa]");
    }
}
