use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";
pub const DEFAULT_TIMEOUT_SECS: f64 = 10.0;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_ERROR_LOG: &str = "error.log";

const API_KEY_VARS: [&str; 2] = ["EXCHANGE_API_KEY", "API_KEY"];
const BASE_URL_VARS: [&str; 2] = ["EXCHANGE_API_BASE_URL", "API_BASE_URL"];

/// Optional settings read from `config.yaml`.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Option<f64>,
    pub data_dir: Option<String>,
    pub error_log: Option<String>,
}

impl AppConfig {
    /// Loads the default config file, or falls back to built-in defaults when
    /// none exists.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        match Self::default_config_path() {
            Ok(path) if path.exists() => Self::load_from_path(&path),
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "fxrate", "fxrate")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(self.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR))
    }

    pub fn error_log_path(&self) -> PathBuf {
        PathBuf::from(self.error_log.as_deref().unwrap_or(DEFAULT_ERROR_LOG))
    }
}

/// Values given on the command line; these win over every other source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Option<f64>,
    pub output_dir: Option<PathBuf>,
}

/// Settings after resolving flags, environment, config file and defaults, in
/// that order.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: f64,
    pub data_dir: PathBuf,
}

impl Settings {
    pub fn resolve<F>(overrides: &Overrides, config: &AppConfig, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| env(name))
                .find(|value| !value.is_empty())
        };

        let api_key = overrides
            .api_key
            .clone()
            .or_else(|| from_env(&API_KEY_VARS))
            .or_else(|| config.api_key.clone());

        let base_url = overrides
            .base_url
            .clone()
            .or_else(|| from_env(&BASE_URL_VARS))
            .or_else(|| config.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = overrides
            .timeout
            .or(config.timeout)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let data_dir = overrides
            .output_dir
            .clone()
            .unwrap_or_else(|| config.data_path());

        Settings {
            api_key,
            base_url,
            timeout_secs,
            data_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
api_key: "from-file"
base_url: "http://rates.internal/"
timeout: 2.5
data_dir: "/var/lib/fxrate"
error_log: "/var/log/fxrate/error.log"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.base_url.as_deref(), Some("http://rates.internal/"));
        assert_eq!(config.timeout, Some(2.5));
        assert_eq!(config.data_path(), PathBuf::from("/var/lib/fxrate"));
        assert_eq!(
            config.error_log_path(),
            PathBuf::from("/var/log/fxrate/error.log")
        );

        let empty: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert!(empty.api_key.is_none());
        assert_eq!(empty.data_path(), PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(empty.error_log_path(), PathBuf::from(DEFAULT_ERROR_LOG));
    }

    #[test]
    fn test_default_config_path_is_project_scoped() {
        // No home directory means no default path; nothing to check then.
        if let Ok(path) = AppConfig::default_config_path() {
            assert!(path.ends_with("config.yaml"));
            let project_dir = path.parent().and_then(|p| p.file_name()).unwrap();
            assert!(project_dir.to_string_lossy().contains("fxrate"));
        }
    }

    #[test]
    fn test_load_from_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");

        let err = AppConfig::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_defaults_when_no_source_is_set() {
        let settings = Settings::resolve(&Overrides::default(), &AppConfig::default(), env_from(&[]));

        assert_eq!(
            settings,
            Settings {
                api_key: None,
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            }
        );
    }

    #[test]
    fn test_env_fallback_order() {
        let config = AppConfig {
            api_key: Some("file-key".to_string()),
            base_url: Some("http://file/".to_string()),
            ..AppConfig::default()
        };

        let env = env_from(&[("API_KEY", "generic-key"), ("API_BASE_URL", "http://generic/")]);
        let settings = Settings::resolve(&Overrides::default(), &config, env);
        assert_eq!(settings.api_key.as_deref(), Some("generic-key"));
        assert_eq!(settings.base_url, "http://generic/");

        let env = env_from(&[
            ("EXCHANGE_API_KEY", "exchange-key"),
            ("API_KEY", "generic-key"),
            ("EXCHANGE_API_BASE_URL", "http://exchange/"),
        ]);
        let settings = Settings::resolve(&Overrides::default(), &config, env);
        assert_eq!(settings.api_key.as_deref(), Some("exchange-key"));
        assert_eq!(settings.base_url, "http://exchange/");

        let settings = Settings::resolve(&Overrides::default(), &config, env_from(&[]));
        assert_eq!(settings.api_key.as_deref(), Some("file-key"));
        assert_eq!(settings.base_url, "http://file/");
    }

    #[test]
    fn test_flags_win_over_everything() {
        let config = AppConfig {
            api_key: Some("file-key".to_string()),
            timeout: Some(3.0),
            data_dir: Some("file-data".to_string()),
            ..AppConfig::default()
        };
        let overrides = Overrides {
            api_key: Some("flag-key".to_string()),
            base_url: Some("http://flag/".to_string()),
            timeout: Some(1.5),
            output_dir: Some(PathBuf::from("out")),
        };
        let env = env_from(&[("EXCHANGE_API_KEY", "env-key"), ("API_BASE_URL", "http://env/")]);

        let settings = Settings::resolve(&overrides, &config, env);
        assert_eq!(settings.api_key.as_deref(), Some("flag-key"));
        assert_eq!(settings.base_url, "http://flag/");
        assert_eq!(settings.timeout_secs, 1.5);
        assert_eq!(settings.data_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_empty_env_value_falls_through() {
        let env = env_from(&[("EXCHANGE_API_KEY", ""), ("API_KEY", "generic-key")]);
        let settings = Settings::resolve(&Overrides::default(), &AppConfig::default(), env);
        assert_eq!(settings.api_key.as_deref(), Some("generic-key"));
    }
}
