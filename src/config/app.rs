use anyhow::{bail, Context, Result};
use std::env;

use crate::auth::CredentialStore;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_level: String,
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(port) => port.parse().context("PORT must be a valid port number")?,
            None => 3000,
        };
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(cost) => cost.parse().context("BCRYPT_COST must be an integer")?,
            None => bcrypt::DEFAULT_COST,
        };

        Ok(AppConfig {
            host,
            port,
            environment,
            log_level,
            jwt_secret,
            bcrypt_cost,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn credential_store(&self) -> CredentialStore {
        CredentialStore::new(self.bcrypt_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_secret() {
        let config = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.server_address(), "0.0.0.0:3000");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert!(config.is_development());
    }

    #[test]
    fn test_secret_is_required() {
        assert!(AppConfig::from_lookup(lookup(&[])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("JWT_SECRET", "  ")])).is_err());
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let result = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s"), ("PORT", "http")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_bcrypt_cost_is_clamped_by_store() {
        let config =
            AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s"), ("BCRYPT_COST", "2")])).unwrap();
        assert_eq!(config.credential_store().cost(), CredentialStore::MIN_COST);
    }

    #[test]
    #[serial]
    fn test_from_env_reads_process_environment() {
        env::set_var("JWT_SECRET", "env_secret");
        env::set_var("PORT", "8081");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.jwt_secret, "env_secret");
        assert_eq!(config.port, 8081);

        env::remove_var("JWT_SECRET");
        env::remove_var("PORT");
        assert!(AppConfig::from_env().is_err());
    }
}
