//! Configuration loading and representation.
//!
//! Sources, lowest precedence first: built-in defaults, an optional `crm.toml`
//! in the working directory, `CRM_*` environment variables, and finally
//! `DATABASE_URL`.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use ::config::ConfigBuilder;
use ::config::builder::DefaultState;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 2019;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

const CONFIG_FILE: &str = "crm";
const ENV_PREFIX: &str = "CRM";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("missing required setting `{0}` (set DATABASE_URL)")]
    Missing(&'static str),
}

/// Process configuration for the customer service.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Postgres connection string.
    #[serde(default)]
    pub database_url: String,
    pub port: u16,
    /// Shared secret expected in the `Authorization` header.
    pub auth_token: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from `.env`, `crm.toml` and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is the common case outside local development.
        let _ = dotenvy::dotenv();
        // Non-UTF-8 variables cannot name a setting; skip them.
        let vars = env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self::load_from(vars)
    }

    /// Same layering as [`AppConfig::load`], reading variables from `vars`
    /// instead of the process environment.
    ///
    /// Values stay strings until deserialization so `auth_token` keeps its
    /// exact bytes (`007` is not `7`).
    pub fn load_from(vars: ::config::Map<String, String>) -> Result<Self, ConfigError> {
        let mut builder = Self::defaults()?
            .add_source(::config::File::with_name(CONFIG_FILE).required(false))
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).source(Some(vars.clone())));

        if let Some(url) = vars.get("DATABASE_URL") {
            builder = builder.set_override("database_url", url.as_str())?;
        }

        Self::from_builder(builder)
    }

    /// Builder pre-populated with every default except `database_url`.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(::config::Config::builder()
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("auth_token", crm_auth::DEFAULT_TOKEN)?
            .set_default("max_connections", i64::from(DEFAULT_MAX_CONNECTIONS))?
            .set_default("acquire_timeout_secs", DEFAULT_ACQUIRE_TIMEOUT_SECS as i64)?)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let cfg: Self = builder.build()?.try_deserialize()?;
        if cfg.database_url.trim().is_empty() {
            return Err(ConfigError::Missing("database_url"));
        }
        Ok(cfg)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let builder = AppConfig::defaults()
            .unwrap()
            .set_override("database_url", "postgres://localhost/crm")
            .unwrap();
        let cfg = AppConfig::from_builder(builder).unwrap();

        assert_eq!(cfg.database_url, "postgres://localhost/crm");
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.auth_token, crm_auth::DEFAULT_TOKEN);
        assert_eq!(cfg.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(cfg.acquire_timeout(), Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS));
        assert_eq!(cfg.bind_addr(), SocketAddr::from(([0, 0, 0, 0], 2019)));
    }

    #[test]
    fn overrides_take_precedence_over_defaults() {
        let builder = AppConfig::defaults()
            .unwrap()
            .set_override("database_url", "postgres://db/crm")
            .unwrap()
            .set_override("port", 8081_i64)
            .unwrap()
            .set_override("auth_token", "other")
            .unwrap();
        let cfg = AppConfig::from_builder(builder).unwrap();

        assert_eq!(cfg.port, 8081);
        assert_eq!(cfg.auth_token, "other");
    }

    fn vars(pairs: &[(&str, &str)]) -> ::config::Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn numeric_looking_token_is_kept_verbatim() {
        let cfg = AppConfig::load_from(vars(&[
            ("DATABASE_URL", "postgres://localhost/crm"),
            ("CRM_AUTH_TOKEN", "007"),
            ("CRM_PORT", "8081"),
        ]))
        .unwrap();

        assert_eq!(cfg.auth_token, "007");
        assert_eq!(cfg.port, 8081);
    }

    #[test]
    fn prefixed_env_overrides_defaults() {
        let cfg = AppConfig::load_from(vars(&[
            ("CRM_DATABASE_URL", "postgres://prefixed/crm"),
            ("CRM_MAX_CONNECTIONS", "3"),
            ("CRM_ACQUIRE_TIMEOUT_SECS", "1"),
            ("AUTH_TOKEN", "ignored-without-prefix"),
        ]))
        .unwrap();

        assert_eq!(cfg.database_url, "postgres://prefixed/crm");
        assert_eq!(cfg.max_connections, 3);
        assert_eq!(cfg.acquire_timeout(), Duration::from_secs(1));
        assert_eq!(cfg.auth_token, crm_auth::DEFAULT_TOKEN);
        assert_eq!(cfg.port, DEFAULT_PORT);
    }

    #[test]
    fn database_url_wins_over_prefixed_variable() {
        let cfg = AppConfig::load_from(vars(&[
            ("CRM_DATABASE_URL", "postgres://prefixed/crm"),
            ("DATABASE_URL", "postgres://plain/crm"),
        ]))
        .unwrap();

        assert_eq!(cfg.database_url, "postgres://plain/crm");
    }

    #[test]
    fn non_numeric_port_is_a_load_error() {
        let err = AppConfig::load_from(vars(&[
            ("DATABASE_URL", "postgres://localhost/crm"),
            ("CRM_PORT", "http"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn empty_environment_reports_missing_database_url() {
        let err = AppConfig::load_from(vars(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("database_url")));
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = AppConfig::from_builder(AppConfig::defaults().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("database_url")));
    }
}
