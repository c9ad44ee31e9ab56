use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, decode_header, encode, Algorithm, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::services::{error::ServiceError, KeyManager, Principal};

/// Fixed access-token lifetime: one hour.
pub const TOKEN_TTL_SECONDS: i64 = 3600;

/// JWT service for token issuance and verification
#[derive(Clone)]
pub struct JwtService {
    keys: Arc<KeyManager>,
    token_ttl_seconds: i64,
}

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (the user's stable identifier)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// User identifier claim
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

/// A signed token together with its expiry instant.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl JwtService {
    pub fn new(keys: Arc<KeyManager>) -> Self {
        Self {
            keys,
            token_ttl_seconds: TOKEN_TTL_SECONDS,
        }
    }

    pub fn with_ttl(keys: Arc<KeyManager>, token_ttl_seconds: i64) -> Self {
        Self {
            keys,
            token_ttl_seconds,
        }
    }

    /// Sign a token for an authenticated principal.
    ///
    /// The header carries the signing key's identifier so a verifier can
    /// select the matching public key after a rotation.
    pub fn issue(&self, principal: &Principal) -> Result<IssuedToken, ServiceError> {
        let issued_at = Utc::now();
        let expires_at = issued_at + Duration::seconds(self.token_ttl_seconds);

        let claims = AccessTokenClaims {
            sub: principal.id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            user_id: principal.id,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.keys.kid().to_string());

        let token = encode(&header, &claims, self.keys.encoding_key())
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Failed to sign token: {}", e)))?;

        Ok(IssuedToken {
            token,
            issued_at,
            expires_at,
        })
    }

    /// Verify signature and expiry, selecting the public key by the
    /// token's key identifier. An unknown kid is an invalid token.
    pub fn verify(&self, token: &str) -> Result<AccessTokenClaims, ServiceError> {
        let header = decode_header(token).map_err(|_| ServiceError::InvalidToken)?;

        let kid = header.kid.ok_or(ServiceError::InvalidToken)?;
        let decoding_key = self
            .keys
            .decoding_key_for(&kid)
            .ok_or(ServiceError::InvalidToken)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = true;

        let token_data = decode::<AccessTokenClaims>(token, decoding_key, &validation)
            .map_err(|_| ServiceError::InvalidToken)?;

        Ok(token_data.claims)
    }

    pub fn token_ttl_seconds(&self) -> i64 {
        self.token_ttl_seconds
    }
}
