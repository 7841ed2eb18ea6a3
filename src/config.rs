use std::env;

use thiserror::Error;

/// Default bearer token lifetime when TOKEN_EXPIRY_SECS is unset.
pub const DEFAULT_TOKEN_EXPIRY_SECS: i64 = 3600;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub security: SecurityConfig,
}

/// Secrets and token policy. Loaded once in main and handed to the services
/// explicitly so the auth component stays testable in isolation.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub token_expiry_secs: i64,
    pub product_key_secret: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

impl AppConfig {
    /// Build configuration from the environment. Token and product-key
    /// secrets are required; the process refuses to start without them.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(v) => v.parse::<u16>().map_err(|_| ConfigError::Invalid("PORT", v))?,
            Err(_) => 3000,
        };

        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let token_expiry_secs = match env::var("TOKEN_EXPIRY_SECS") {
            Ok(v) => v
                .parse::<i64>()
                .map_err(|_| ConfigError::Invalid("TOKEN_EXPIRY_SECS", v))?,
            Err(_) => DEFAULT_TOKEN_EXPIRY_SECS,
        };

        Ok(Self {
            port,
            database_url,
            security: SecurityConfig {
                jwt_secret: require_secret("JSON_TOKEN_KEY")?,
                token_expiry_secs,
                product_key_secret: require_secret("PRODUCT_KEY_SECRET")?,
            },
        })
    }
}

fn require_secret(name: &'static str) -> Result<String, ConfigError> {
    let value = env::var(name).map_err(|_| ConfigError::Missing(name))?;
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(name, "must not be empty".to_string()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so env mutation stays sequential; #[test] fns run in
    // parallel threads sharing the process environment.
    #[test]
    fn loads_from_env_and_fails_fast_on_missing_secrets() {
        env::set_var("DATABASE_URL", "postgres://localhost/realtor");
        env::set_var("JSON_TOKEN_KEY", "token-secret");
        env::set_var("PRODUCT_KEY_SECRET", "key-secret");
        env::set_var("PORT", "4100");
        env::remove_var("TOKEN_EXPIRY_SECS");

        let config = AppConfig::from_env().expect("config should load");
        assert_eq!(config.port, 4100);
        assert_eq!(config.security.jwt_secret, "token-secret");
        assert_eq!(config.security.token_expiry_secs, DEFAULT_TOKEN_EXPIRY_SECS);

        env::set_var("JSON_TOKEN_KEY", "  ");
        assert!(matches!(
            AppConfig::from_env(),
            Err(ConfigError::Invalid("JSON_TOKEN_KEY", _))
        ));

        env::remove_var("JSON_TOKEN_KEY");
        assert!(matches!(
            AppConfig::from_env(),
            Err(ConfigError::Missing("JSON_TOKEN_KEY"))
        ));

        env::set_var("JSON_TOKEN_KEY", "token-secret");
    }
}
