// JWT token service for authentication
// Decision: Use HS256 algorithm for simplicity (symmetric key)
// Decision: Sessions are stateless - tokens are never persisted and cannot be
// revoked before expiry

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use campus_core::Role;

use super::config::JwtConfig;

/// Token claims: account identity plus issue/expiry timestamps
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Account ID
    pub id: Uuid,
    /// Account email
    pub email: String,
    /// Account role
    pub role: Role,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Why a presented token was rejected. The gate collapses all three to 401
/// toward the caller; the distinction is for server-side logs and tests.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
}

/// Token issuer/verifier. Keys are built once from the configured secret.
#[derive(Clone)]
pub struct TokenService {
    token_ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        // TTL is bounded config, not a per-call-site literal
        let token_ttl = Duration::from_std(config.token_ttl)
            .unwrap_or_else(|_| Duration::hours(1));

        Self {
            token_ttl,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue a signed token for an account
    pub fn issue(&self, account_id: Uuid, email: &str, role: Role) -> anyhow::Result<String> {
        let now = Utc::now();
        let claims = Claims {
            id: account_id,
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode token: {}", e))
    }

    /// Verify signature and expiry, returning the decoded claims.
    /// Signature integrity is checked before expiry; expiry has zero leeway.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => Err(match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            }),
        }
    }

    /// Token lifetime in seconds, as reported to clients
    pub fn token_ttl_secs(&self) -> i64 {
        self.token_ttl.num_seconds()
    }
}
