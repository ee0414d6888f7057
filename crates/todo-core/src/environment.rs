//! # Runtime Environment
//!
//! Describes where the process is running. Parsed from `APP_ENV` or the
//! `--env` flag. Bootstrap threads it through and logs it; it does not
//! vary behavior.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// The environment the application was started in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Testing,
    Production,
    /// Any name not recognised above, kept verbatim.
    Custom(String),
}

impl Environment {
    /// Short name of the environment.
    pub fn name(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Testing => "testing",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }
}

impl FromStr for Environment {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let env = match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Self::Development,
            "test" | "testing" => Self::Testing,
            "prod" | "production" => Self::Production,
            _ => Self::Custom(s.trim().to_string()),
        };
        Ok(env)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Environment {
        s.parse().unwrap()
    }

    #[test]
    fn parses_short_and_long_names() {
        assert_eq!(parse("dev"), Environment::Development);
        assert_eq!(parse("development"), Environment::Development);
        assert_eq!(parse("test"), Environment::Testing);
        assert_eq!(parse("testing"), Environment::Testing);
        assert_eq!(parse("prod"), Environment::Production);
        assert_eq!(parse("Production"), Environment::Production);
    }

    #[test]
    fn unknown_name_is_custom() {
        let env = parse(" staging ");
        assert_eq!(env, Environment::Custom("staging".to_string()));
        assert_eq!(env.name(), "staging");
    }

    #[test]
    fn default_is_development() {
        assert_eq!(Environment::default(), Environment::Development);
    }
}
