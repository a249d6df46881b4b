//! mesa-server configuration

use crate::BoxError;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL; `None` selects the in-memory store
    pub database_url: Option<String>,
    /// Pool size for the PostgreSQL store
    pub db_max_connections: u32,
    /// HTTP listen port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit JSON log lines
    pub log_json: bool,
    /// Daily rolling log files are written here when set
    pub log_dir: Option<String>,
    /// Front-end directory served as the router fallback
    pub static_dir: String,
    /// Permissive CORS layer
    pub cors_enabled: bool,
    /// Tables seeded into the in-memory store ("Mesa 1" ..= "Mesa N")
    pub memory_tables: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            db_max_connections: 10,
            http_port: 3000,
            environment: "development".into(),
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            static_dir: "public".into(),
            cors_enabled: false,
            memory_tables: 10,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BoxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let config = Self {
            database_url: var("DATABASE_URL"),
            db_max_connections: parse_var(&var, "DB_MAX_CONNECTIONS")?
                .unwrap_or(defaults.db_max_connections),
            http_port: parse_var(&var, "HTTP_PORT")?.unwrap_or(defaults.http_port),
            environment: var("ENVIRONMENT").unwrap_or(defaults.environment),
            log_level: var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_json: parse_flag(&var, "LOG_JSON")?.unwrap_or(defaults.log_json),
            log_dir: var("LOG_DIR"),
            static_dir: var("STATIC_DIR").unwrap_or(defaults.static_dir),
            cors_enabled: parse_flag(&var, "CORS_ENABLED")?.unwrap_or(defaults.cors_enabled),
            memory_tables: parse_var(&var, "MEMORY_TABLES")?.unwrap_or(defaults.memory_tables),
        };

        if config.database_url.is_none() && config.is_production() {
            return Err("DATABASE_URL must be set in production environment".into());
        }
        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_var<T, F>(var: &F, name: &str) -> Result<Option<T>, BoxError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    var(name)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| format!("invalid {name}={raw}: {e}").into())
        })
        .transpose()
}

fn parse_flag<F>(var: &F, name: &str) -> Result<Option<bool>, BoxError>
where
    F: Fn(&str) -> Option<String>,
{
    var(name)
        .map(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(format!("invalid {name}={raw}: expected true or false").into()),
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, BoxError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert!(config.database_url.is_none());
        assert_eq!(config.http_port, 3000);
        assert_eq!(config.static_dir, "public");
        assert_eq!(config.memory_tables, 10);
        assert!(!config.cors_enabled);
        assert!(!config.is_production());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/mesas"),
            ("HTTP_PORT", "8080"),
            ("CORS_ENABLED", "true"),
            ("LOG_JSON", "1"),
            ("LOG_DIR", "/var/log/mesa"),
        ])
        .unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/mesas")
        );
        assert_eq!(config.http_port, 8080);
        assert!(config.cors_enabled);
        assert!(config.log_json);
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/mesa"));
    }

    #[test]
    fn test_production_requires_database() {
        assert!(config_from(&[("ENVIRONMENT", "production")]).is_err());
        assert!(
            config_from(&[
                ("ENVIRONMENT", "production"),
                ("DATABASE_URL", "postgres://db/mesas"),
            ])
            .unwrap()
            .is_production()
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(config_from(&[("HTTP_PORT", "http")]).is_err());
        assert!(config_from(&[("CORS_ENABLED", "maybe")]).is_err());
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = config_from(&[("STATIC_DIR", "  "), ("HTTP_PORT", "")]).unwrap();
        assert_eq!(config.static_dir, "public");
        assert_eq!(config.http_port, 3000);
    }
}
