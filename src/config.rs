//! Layered settings.
//!
//! Values are merged in this order, later sources winning:
//!
//! 1. Built-in defaults
//! 2. A TOML file (`sparkx.toml` in the working directory if present, or
//!    the file given with `--config`)
//! 3. `SPARKX_*` environment variables, with `__` between nested keys
//!    (`SPARKX_SOURCE__URL`, `SPARKX_THRESHOLDS__BATTERY__LOW`)
//!
//! Command-line flags are applied on top by the binary.
//!
//! ```toml
//! [source]
//! url = "http://localhost:3001"
//! robots_interval_secs = 5
//!
//! [thresholds.battery]
//! low = 25
//!
//! [filter]
//! region = "Europe"
//!
//! [logging]
//! level = "debug"
//! file = "sparkx.log"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{RobotFilter, ThresholdConfig, ThresholdError};
use crate::source::HttpSourceConfig;

/// File name looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "sparkx.toml";

const ENV_PREFIX: &str = "SPARKX";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid thresholds: {0}")]
    Thresholds(#[from] ThresholdError),
}

/// Where fleet data comes from and how often it is refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// JSON file to poll. Used when no `url` is set.
    pub file: PathBuf,
    /// Base URL of the fleet REST backend.
    pub url: Option<String>,
    pub robots_interval_secs: u64,
    pub detail_interval_secs: u64,
    pub timeout_secs: u64,
    /// How far back telemetry is fetched for the watched robot.
    pub telemetry_hours: u32,
    /// How often the dashboard polls its source.
    pub refresh_ms: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from("fleet.json"),
            url: None,
            robots_interval_secs: 5,
            detail_interval_secs: 3,
            timeout_secs: 10,
            telemetry_hours: 24,
            refresh_ms: 1000,
        }
    }
}

impl SourceSettings {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms.max(50))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when `SPARKX_LOG` is not set.
    pub level: String,
    /// Log file. The dashboard owns the terminal, so without a file the
    /// interactive mode does not log at all.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Auto,
    Dark,
    Light,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub source: SourceSettings,
    pub thresholds: ThresholdConfig,
    pub filter: RobotFilter,
    pub logging: LoggingSettings,
    pub theme: ThemeChoice,
}

impl Settings {
    /// Load settings from defaults, the optional config file and the
    /// process environment.
    ///
    /// An explicit `path` must exist; the default `sparkx.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        Self::build(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn build(path: Option<&Path>, env: Environment) -> Result<Self, SettingsError> {
        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Toml).required(true),
            None => File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(file)
            .add_source(
                env.prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.thresholds.validate()?;
        Ok(settings)
    }

    /// Settings for an [`HttpSource`](crate::source::HttpSource), if a URL
    /// is configured.
    pub fn http_source(&self) -> Option<HttpSourceConfig> {
        let base_url = self.source.url.clone()?;
        Some(HttpSourceConfig {
            base_url,
            robots_interval: Duration::from_secs(self.source.robots_interval_secs.max(1)),
            detail_interval: Duration::from_secs(self.source.detail_interval_secs.max(1)),
            timeout: Duration::from_secs(self.source.timeout_secs.max(1)),
            telemetry_hours: self.source.telemetry_hours,
            filter: self.filter.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparkx_types::RobotStatus;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    fn toml_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::build(None, env(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.thresholds, ThresholdConfig::DEFAULT);
        assert!(settings.http_source().is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = toml_file(
            r#"
            theme = "light"

            [source]
            url = "http://fleet:3001"
            robots_interval_secs = 7

            [thresholds.battery]
            low = 25

            [filter]
            status = "charging"
            region = "Europe"
            "#,
        );

        let settings = Settings::build(Some(file.path()), env(&[])).unwrap();
        assert_eq!(settings.theme, ThemeChoice::Light);
        assert_eq!(settings.thresholds.battery.low, 25.0);
        assert_eq!(settings.thresholds.battery.critical, 20.0);
        assert_eq!(settings.filter.status, Some(RobotStatus::Charging));

        let http = settings.http_source().unwrap();
        assert_eq!(http.base_url, "http://fleet:3001");
        assert_eq!(http.robots_interval, Duration::from_secs(7));
        assert_eq!(http.detail_interval, Duration::from_secs(3));
        assert_eq!(http.filter.region.as_deref(), Some("Europe"));
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = toml_file("[source]\nurl = \"http://from-file\"\n");

        let settings = Settings::build(
            Some(file.path()),
            env(&[
                ("SPARKX_SOURCE__URL", "http://from-env"),
                ("SPARKX_THRESHOLDS__TEMPERATURE__CRITICAL", "80"),
                ("SPARKX_LOGGING__LEVEL", "debug"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.source.url.as_deref(), Some("http://from-env"));
        assert_eq!(settings.thresholds.temperature.critical, 80.0);
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn test_rejects_unordered_thresholds() {
        let file = toml_file("[thresholds.battery]\nlow = 95\n");

        let err = Settings::build(Some(file.path()), env(&[])).unwrap_err();
        assert!(matches!(err, SettingsError::Thresholds(_)));
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let err = Settings::build(Some(Path::new("/nonexistent/sparkx.toml")), env(&[])).unwrap_err();
        assert!(matches!(err, SettingsError::Load(_)));
    }
}
