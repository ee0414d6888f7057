//! # Process Configuration
//!
//! Settings read from the environment at startup and optionally overridden
//! by command-line flags. Database credentials are not read here; they are
//! registered by the bootstrap configurator.
//!
//! | Variable                        | Default   |
//! |---------------------------------|-----------|
//! | `HOST`                          | `0.0.0.0` |
//! | `PORT`                          | `8080`    |
//! | `LOG_FORMAT` (`pretty`/`json`)  | `pretty`  |
//! | `DATABASE_ACQUIRE_TIMEOUT_SECS` | `5`       |
//! | `APP_ENV`                       | `development` |

use std::str::FromStr;
use std::time::Duration;

use todo_core::Environment;
use tracing_subscriber::EnvFilter;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, one line per event.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub hostname: String,
    pub port: u16,
    pub log_format: LogFormat,
    /// How long a request waits for a pooled connection before failing.
    pub database_acquire_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            hostname: "0.0.0.0".to_string(),
            port: 8080,
            log_format: LogFormat::Pretty,
            database_acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// A variable that was set but could not be parsed. Its default was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidValue {
    pub key: &'static str,
    pub value: String,
}

impl InvalidValue {
    /// Report the ignored value. Call once tracing is installed.
    pub fn log(&self) {
        tracing::warn!(
            key = self.key,
            value = %self.value,
            "ignoring unparseable configuration value"
        );
    }
}

impl AppConfig {
    /// Build configuration from process environment variables.
    ///
    /// Runs before tracing is installed, so unparseable values are returned
    /// for the caller to log rather than logged here.
    pub fn from_env() -> (Self, Vec<InvalidValue>) {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Unparseable values fall back to the default and are returned
    /// alongside the configuration.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> (Self, Vec<InvalidValue>) {
        let defaults = Self::default();
        let mut invalid = Vec::new();

        let hostname = lookup("HOST").unwrap_or(defaults.hostname);
        let port = parse_or(&lookup, "PORT", defaults.port, &mut invalid);
        let log_format = parse_or(&lookup, "LOG_FORMAT", defaults.log_format, &mut invalid);
        let acquire_secs = parse_or(
            &lookup,
            "DATABASE_ACQUIRE_TIMEOUT_SECS",
            defaults.database_acquire_timeout.as_secs(),
            &mut invalid,
        );

        let config = Self {
            hostname,
            port,
            log_format,
            database_acquire_timeout: Duration::from_secs(acquire_secs),
        };
        (config, invalid)
    }

    /// `host:port` the server binds to. Host names are resolved at bind time.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }
}

/// Read the runtime environment from `APP_ENV`.
pub fn environment_from_env() -> Environment {
    std::env::var("APP_ENV")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
    invalid: &mut Vec<InvalidValue>,
) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            invalid.push(InvalidValue { key, value: raw });
            default
        }),
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` applies.
pub fn init_tracing(format: LogFormat, default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    match format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let (config, invalid) = AppConfig::from_lookup(lookup_from(&[]));
        assert!(invalid.is_empty());
        assert_eq!(config.hostname, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.database_acquire_timeout, Duration::from_secs(5));
    }

    #[test]
    fn reads_all_variables() {
        let (config, invalid) = AppConfig::from_lookup(lookup_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("LOG_FORMAT", "json"),
            ("DATABASE_ACQUIRE_TIMEOUT_SECS", "2"),
        ]));
        assert_eq!(config.hostname, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.database_acquire_timeout, Duration::from_secs(2));
        assert!(invalid.is_empty());
    }

    #[test]
    fn invalid_values_fall_back_and_are_reported() {
        let (config, invalid) = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "eighty"),
            ("LOG_FORMAT", "xml"),
            ("DATABASE_ACQUIRE_TIMEOUT_SECS", "-1"),
        ]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.database_acquire_timeout, Duration::from_secs(5));

        let keys: Vec<_> = invalid.iter().map(|v| v.key).collect();
        assert_eq!(keys, ["PORT", "LOG_FORMAT", "DATABASE_ACQUIRE_TIMEOUT_SECS"]);
        assert_eq!(invalid[0].value, "eighty");
    }

    #[test]
    fn bind_address_combines_host_and_port() {
        let config = AppConfig {
            hostname: "localhost".into(),
            port: 3000,
            ..AppConfig::default()
        };
        assert_eq!(config.bind_address(), "localhost:3000");
    }

    #[test]
    fn log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
