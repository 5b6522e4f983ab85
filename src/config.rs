//! Process configuration read from the environment.

use std::net::SocketAddr;
use std::str::FromStr;

use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    /// Create the database named in `database_url` when it is missing.
    pub create_database: bool,
    pub body_limit_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(AppConfig {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "postgres://localhost/students".into()),
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, "APP_PORT", 3000)?,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            create_database: parse_or(&lookup, "CREATE_DATABASE", true)?,
            body_limit_bytes: parse_or(&lookup, "BODY_LIMIT_BYTES", 64 * 1024)?,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::Address(addr))
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let c = config(&[]).unwrap();
        assert_eq!(c.database_url, "postgres://localhost/students");
        assert_eq!(c.port, 3000);
        assert_eq!(c.max_connections, 5);
        assert!(c.create_database);
        assert_eq!(c.bind_addr().unwrap().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn reads_overrides() {
        let c = config(&[
            ("APP_HOST", "127.0.0.1"),
            ("APP_PORT", "8080"),
            ("CREATE_DATABASE", "false"),
            ("BODY_LIMIT_BYTES", "1024"),
        ])
        .unwrap();
        assert_eq!(c.bind_addr().unwrap().to_string(), "127.0.0.1:8080");
        assert!(!c.create_database);
        assert_eq!(c.body_limit_bytes, 1024);
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = config(&[("APP_PORT", "eighty")]).unwrap_err();
        assert_eq!(err.to_string(), "invalid value for APP_PORT: 'eighty'");
    }

    #[test]
    fn rejects_bad_host() {
        let c = config(&[("APP_HOST", "not a host")]).unwrap();
        assert!(matches!(c.bind_addr(), Err(ConfigError::Address(_))));
    }
}
