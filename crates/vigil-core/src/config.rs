//! Config - interceptor と Sentry client の設定
//!
//! 読み込み順:
//! 1. `MonitorConfig::default()` または TOML ファイル
//! 2. 環境変数で上書き（`with_env_overrides`）
//!
//! 環境変数の参照は `lookup` 関数として注入できるので、テストでは
//! プロセスの環境を変更しない。

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::app::CaptureOptions;

pub const ENV_DSN: &str = "SENTRY_DSN";
pub const ENV_ENVIRONMENT: &str = "SENTRY_ENVIRONMENT";
pub const ENV_RELEASE: &str = "SENTRY_RELEASE";
pub const ENV_TRACES_SAMPLE_RATE: &str = "SENTRY_TRACES_SAMPLE_RATE";
pub const ENV_CAPTURE_INPUT: &str = "VIGIL_CAPTURE_INPUT";
pub const ENV_CAPTURE_INFO: &str = "VIGIL_CAPTURE_INFO";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// Sentry DSN. Reporting to Sentry is disabled when unset.
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub release: Option<String>,
    /// Fraction of activity transactions sent to Sentry, within `[0, 1]`.
    pub traces_sample_rate: f32,
    /// Attach a single record argument as `temporal.activity.input` on failure.
    pub capture_input: bool,
    /// Attach the full activity info as `temporal.activity.info` on failure.
    pub capture_info: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("traces_sample_rate must be within [0, 1], got {0}")]
    InvalidSampleRate(f32),

    #[error("{key} must be a number, got '{value}'")]
    InvalidNumber { key: String, value: String },

    #[error("{key} must be a boolean, got '{value}'")]
    InvalidBool { key: String, value: String },

    #[error("invalid DSN: {0}")]
    InvalidDsn(String),
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: None,
            release: None,
            traces_sample_rate: 0.0,
            capture_input: true,
            capture_info: true,
        }
    }
}

impl MonitorConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Override fields from `lookup`. Empty values are treated as unset.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dsn) = get(ENV_DSN) {
            self.dsn = Some(dsn);
        }
        if let Some(environment) = get(ENV_ENVIRONMENT) {
            self.environment = Some(environment);
        }
        if let Some(release) = get(ENV_RELEASE) {
            self.release = Some(release);
        }
        if let Some(raw) = get(ENV_TRACES_SAMPLE_RATE) {
            self.traces_sample_rate =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidNumber {
                        key: ENV_TRACES_SAMPLE_RATE.to_string(),
                        value: raw.clone(),
                    })?;
        }
        if let Some(raw) = get(ENV_CAPTURE_INPUT) {
            self.capture_input = parse_bool(ENV_CAPTURE_INPUT, &raw)?;
        }
        if let Some(raw) = get(ENV_CAPTURE_INFO) {
            self.capture_info = parse_bool(ENV_CAPTURE_INFO, &raw)?;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.traces_sample_rate) {
            return Err(ConfigError::InvalidSampleRate(self.traces_sample_rate));
        }
        Ok(())
    }

    pub fn capture_options(&self) -> CaptureOptions {
        CaptureOptions {
            capture_input: self.capture_input,
            capture_info: self.capture_info,
        }
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_capture_everything_and_disable_sentry() {
        let c = MonitorConfig::default();
        assert!(c.dsn.is_none());
        assert!(c.capture_input);
        assert!(c.capture_info);
        assert_eq!(c.traces_sample_rate, 0.0);
    }

    #[test]
    fn toml_fills_missing_fields_with_defaults() {
        let c = MonitorConfig::from_toml_str(
            r#"
            dsn = "https://key@sentry.example.com/42"
            traces_sample_rate = 0.25
            capture_input = false
            "#,
        )
        .unwrap();
        assert_eq!(c.dsn.as_deref(), Some("https://key@sentry.example.com/42"));
        assert_eq!(c.traces_sample_rate, 0.25);
        assert!(!c.capture_input);
        assert!(c.capture_info);
    }

    #[test]
    fn toml_rejects_unknown_fields() {
        let err = MonitorConfig::from_toml_str("sample_rate = 1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn toml_rejects_out_of_range_sample_rate() {
        let err = MonitorConfig::from_toml_str("traces_sample_rate = 1.5").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSampleRate(r) if r == 1.5));
    }

    #[test]
    fn env_overrides_file_values() {
        let c = MonitorConfig::from_toml_str(r#"environment = "staging""#)
            .unwrap()
            .with_env_overrides(env(&[
                (ENV_ENVIRONMENT, "production"),
                (ENV_RELEASE, "worker@1.2.3"),
                (ENV_TRACES_SAMPLE_RATE, "0.5"),
                (ENV_CAPTURE_INFO, "off"),
            ]))
            .unwrap();
        assert_eq!(c.environment.as_deref(), Some("production"));
        assert_eq!(c.release.as_deref(), Some("worker@1.2.3"));
        assert_eq!(c.traces_sample_rate, 0.5);
        assert!(!c.capture_info);
        assert!(c.capture_input);
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let c = MonitorConfig::default()
            .with_env_overrides(env(&[(ENV_DSN, "  ")]))
            .unwrap();
        assert!(c.dsn.is_none());
    }

    #[test]
    fn malformed_env_values_are_errors() {
        let err = MonitorConfig::default()
            .with_env_overrides(env(&[(ENV_CAPTURE_INPUT, "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBool { .. }));

        let err = MonitorConfig::default()
            .with_env_overrides(env(&[(ENV_TRACES_SAMPLE_RATE, "half")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = MonitorConfig::from_file("/nonexistent/vigil.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/vigil.toml"));
    }
}
