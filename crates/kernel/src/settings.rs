use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "TOMATO_ENV";
const CONFIG_DIR_ENV: &str = "TOMATO_CONFIG_DIR";
const ENV_PREFIX: &str = "TOMATO";

/// Environment variable holding the MongoDB connection string.
pub const MONGODB_URI_ENV: &str = "MONGODB_URI";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl Environment {
    fn parse(name: &str) -> anyhow::Result<Self> {
        match name {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay
    /// and process environment variables.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Same as [`Settings::load`] but reads variables from `vars` instead of
    /// the process environment, and skips `.env`.
    pub fn from_vars(vars: &HashMap<String, String>) -> anyhow::Result<Self> {
        let environment = vars
            .get(ENV_VAR_NAME)
            .cloned()
            .unwrap_or_else(|| DEFAULT_ENV.to_string());

        let config_dir = match vars.get(CONFIG_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => std::env::current_dir()
                .with_context(|| "unable to resolve current directory")?
                .join("config"),
        };

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars.clone())),
            );

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        settings.environment = Environment::parse(&environment)?;

        // MONGODB_URI wins over every other layer; an empty value counts as unset.
        if let Some(uri) = vars.get(MONGODB_URI_ENV).filter(|uri| !uri.is_empty()) {
            settings.database.uri = Some(uri.clone());
        }

        Ok(settings)
    }
}

/// Connection parameters for the document database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Opaque connection string, handed to the driver as is.
    #[serde(default)]
    pub uri: Option<String>,
    /// Database used when the connection string names none.
    #[serde(default = "DatabaseSettings::default_name")]
    pub name: String,
    #[serde(default = "DatabaseSettings::default_app_name")]
    pub app_name: String,
    #[serde(default)]
    pub connect_timeout_ms: Option<u64>,
    #[serde(default)]
    pub server_selection_timeout_ms: Option<u64>,
}

impl DatabaseSettings {
    fn default_name() -> String {
        "tomato".to_string()
    }

    fn default_app_name() -> String {
        "tomato-backend".to_string()
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            uri: None,
            name: Self::default_name(),
            app_name: Self::default_app_name(),
            connect_timeout_ms: None,
            server_selection_timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default = "TelemetrySettings::default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl TelemetrySettings {
    fn default_log_filter() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_filter: Self::default_log_filter(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        let mut map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        // Point at a directory without config files so only `vars` apply.
        map.entry(CONFIG_DIR_ENV.to_string())
            .or_insert_with(|| "/nonexistent/tomato-config".to_string());
        map
    }

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn default_database_has_no_uri() {
        let settings = Settings::default();
        assert!(settings.database.uri.is_none());
        assert_eq!(settings.database.name, "tomato");
    }

    #[test]
    fn mongodb_uri_is_picked_up() {
        let settings =
            Settings::from_vars(&vars(&[(MONGODB_URI_ENV, "mongodb://db:27017/food")])).unwrap();
        assert_eq!(
            settings.database.uri.as_deref(),
            Some("mongodb://db:27017/food")
        );
    }

    #[test]
    fn empty_mongodb_uri_counts_as_missing() {
        let settings = Settings::from_vars(&vars(&[(MONGODB_URI_ENV, "")])).unwrap();
        assert!(settings.database.uri.is_none());
    }

    #[test]
    fn mongodb_uri_overrides_prefixed_variable() {
        let settings = Settings::from_vars(&vars(&[
            ("TOMATO_DATABASE__URI", "mongodb://other:27017"),
            (MONGODB_URI_ENV, "mongodb://primary:27017"),
        ]))
        .unwrap();
        assert_eq!(
            settings.database.uri.as_deref(),
            Some("mongodb://primary:27017")
        );
    }

    #[test]
    fn prefixed_variables_override_defaults() {
        let settings = Settings::from_vars(&vars(&[
            ("TOMATO_DATABASE__NAME", "orders"),
            ("TOMATO_DATABASE__SERVER_SELECTION_TIMEOUT_MS", "250"),
            ("TOMATO_TELEMETRY__LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(settings.database.name, "orders");
        assert_eq!(settings.database.server_selection_timeout_ms, Some(250));
        assert_eq!(settings.telemetry.log_format, LogFormat::Json);
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let err = Settings::from_vars(&vars(&[(ENV_VAR_NAME, "moon")])).unwrap_err();
        assert!(err.to_string().contains("unsupported environment 'moon'"));
    }

    #[test]
    fn environment_name_is_parsed() {
        let settings = Settings::from_vars(&vars(&[(ENV_VAR_NAME, "staging")])).unwrap();
        assert_eq!(settings.environment, Environment::Staging);
    }
}
