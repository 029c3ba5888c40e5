// Authentication configuration loaded from environment variables.
// Decision: AUTH_ prefix for all auth config
// Decision: A missing signing secret is a startup error, never a silent default

use std::time::Duration;
use thiserror::Error;

/// Default session window for issued tokens
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("AUTH_JWT_SECRET must be set")]
    MissingSecret,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token lifetime
    pub token_ttl: Duration,
}

/// Complete authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt: JwtConfig,
}

impl AuthConfig {
    /// Load configuration from environment variables. Fails when the signing
    /// secret is absent or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = std::env::var("AUTH_JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingSecret)?;

        let token_ttl = std::env::var("AUTH_TOKEN_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_TTL);

        Ok(Self {
            jwt: JwtConfig { secret, token_ttl },
        })
    }

    /// Fixed configuration for tests
    pub fn for_tests(secret: &str) -> Self {
        Self {
            jwt: JwtConfig {
                secret: secret.to_string(),
                token_ttl: DEFAULT_TOKEN_TTL,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_config_defaults() {
        let config = AuthConfig::for_tests("fixture-secret");
        assert_eq!(config.jwt.secret, "fixture-secret");
        assert_eq!(config.jwt.token_ttl, Duration::from_secs(3600));
    }
}
