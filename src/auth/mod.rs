pub mod password;
pub mod product_key;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;
use crate::error::ApiError;

/// Bearer token payload: the holder's display name and user id plus the
/// standard issued-at/expiry timestamps.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub name: String,
    pub id: i64,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies bearer tokens with an injected secret and fixed expiry.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    expiry_secs: i64,
}

impl TokenIssuer {
    pub fn new(security: &SecurityConfig) -> Self {
        Self {
            secret: security.jwt_secret.clone(),
            expiry_secs: security.token_expiry_secs,
        }
    }

    pub fn issue(&self, name: &str, id: i64) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = Claims {
            name: name.to_string(),
            id,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.expiry_secs)).timestamp(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key).map_err(|e| {
            tracing::error!("Token generation failed: {}", e);
            ApiError::internal_server_error("Failed to issue token")
        })
    }

    /// Verify signature and expiry, returning the decoded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())?;
        Ok(token_data.claims)
    }
}
