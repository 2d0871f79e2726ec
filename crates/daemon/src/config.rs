//! Server settings
//!
//! Layered with the `config` crate, lowest precedence first: built-in
//! defaults, an optional TOML file, then `JOBLIST_*` environment variables
//! (`__` separates nested keys, e.g. `JOBLIST_HTTP__PORT`).

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "JOBLIST";
const DEFAULT_DATABASE_URL: &str = "sqlite://~/.joblist/jobs.db";
const IN_MEMORY_DATABASE_URL: &str = "sqlite::memory:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunEnvironment {
    Development,
    Testing,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    pub format: LogFormat,
    /// Also write logs to daily files in this directory
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub environment: RunEnvironment,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub http: HttpSettings,
    pub log: LogSettings,
}

impl Settings {
    /// Load from defaults, `file` (if any) and the process environment
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_sources(file, None)
    }

    /// `env` replaces the process environment when given
    fn from_sources(
        file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("environment", "development")?
            .set_default("database_max_connections", 10)?
            .set_default("http.host", "127.0.0.1")?
            .set_default("http.port", 5000)?
            .set_default("log.format", "pretty")?;

        if let Some(path) = file {
            let path = path.to_string_lossy();
            builder = builder.add_source(File::new(&path, FileFormat::Toml).required(true));
        }

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.environment == RunEnvironment::Production && self.database_url.is_none() {
            return Err(ConfigError::Message(
                "database_url must be set in production".to_string(),
            ));
        }
        if self.database_max_connections == 0 {
            return Err(ConfigError::Message(
                "database_max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective database URL with `~` expanded. The testing environment
    /// always uses a private in-memory database.
    pub fn database_url(&self) -> String {
        if self.environment == RunEnvironment::Testing {
            return IN_MEMORY_DATABASE_URL.to_string();
        }
        let url = self.database_url.as_deref().unwrap_or(DEFAULT_DATABASE_URL);
        expand_database_url(url)
    }
}

fn expand_database_url(url: &str) -> String {
    match url.strip_prefix("sqlite://") {
        Some(rest) => format!("sqlite://{}", shellexpand::tilde(rest)),
        None => shellexpand::tilde(url).into_owned(),
    }
}

/// File backing a SQLite URL, `None` for in-memory databases
pub fn database_file(url: &str) -> Option<PathBuf> {
    if url.contains(":memory:") {
        return None;
    }
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_sources(None, env(&[])).unwrap();
        assert_eq!(settings.environment, RunEnvironment::Development);
        assert_eq!(settings.http.host, "127.0.0.1");
        assert_eq!(settings.http.port, 5000);
        assert_eq!(settings.database_max_connections, 10);
        assert_eq!(settings.log.format, LogFormat::Pretty);
        assert!(settings.log.directory.is_none());
        assert!(settings.database_url().starts_with("sqlite://"));
        assert!(settings.database_url().ends_with(".joblist/jobs.db"));
        assert!(!settings.database_url().contains('~'));
    }

    #[test]
    fn test_env_overrides() {
        let settings = Settings::from_sources(
            None,
            env(&[
                ("JOBLIST_HTTP__PORT", "8080"),
                ("JOBLIST_LOG__FORMAT", "json"),
                ("JOBLIST_DATABASE_URL", "sqlite:///tmp/jobs.db"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.http.port, 8080);
        assert_eq!(settings.log.format, LogFormat::Json);
        assert_eq!(settings.database_url(), "sqlite:///tmp/jobs.db");
    }

    #[test]
    fn test_file_then_env_precedence() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "database_url = \"sqlite://from-file.db\"\n[http]\nport = 6000\nhost = \"0.0.0.0\""
        )
        .unwrap();

        let settings =
            Settings::from_sources(Some(file.path()), env(&[("JOBLIST_HTTP__PORT", "7000")]))
                .unwrap();
        assert_eq!(settings.http.port, 7000);
        assert_eq!(settings.http.host, "0.0.0.0");
        assert_eq!(settings.database_url(), "sqlite://from-file.db");
    }

    #[test]
    fn test_testing_environment_uses_memory() {
        let settings = Settings::from_sources(
            None,
            env(&[
                ("JOBLIST_ENVIRONMENT", "testing"),
                ("JOBLIST_DATABASE_URL", "sqlite://ignored.db"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.database_url(), "sqlite::memory:");
    }

    #[test]
    fn test_production_requires_database_url() {
        let err = Settings::from_sources(None, env(&[("JOBLIST_ENVIRONMENT", "production")]))
            .unwrap_err();
        assert!(err.to_string().contains("database_url"));

        let settings = Settings::from_sources(
            None,
            env(&[
                ("JOBLIST_ENVIRONMENT", "production"),
                ("JOBLIST_DATABASE_URL", "sqlite:///var/lib/joblist/jobs.db"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.environment, RunEnvironment::Production);
    }

    #[test]
    fn test_database_file() {
        assert_eq!(database_file("sqlite::memory:"), None);
        assert_eq!(
            database_file("sqlite:///tmp/jobs.db?mode=rwc"),
            Some(PathBuf::from("/tmp/jobs.db"))
        );
        assert_eq!(database_file("sqlite:jobs.db"), Some(PathBuf::from("jobs.db")));
    }
}
