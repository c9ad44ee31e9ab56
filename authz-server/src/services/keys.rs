//! Signing key management.
//!
//! The RSA key pair is generated once at process start and is read-only
//! thereafter; every restart mints a fresh pair, so outstanding tokens
//! do not survive a restart. Tokens and the published JWKS both carry
//! the key identifier, which keeps verifier-side key selection working
//! if persisted or rotated keys are introduced later.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use jsonwebtoken::{DecodingKey, EncodingKey};
use rsa::{
    pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding},
    traits::PublicKeyParts,
    RsaPrivateKey, RsaPublicKey,
};

const RSA_KEY_BITS: usize = 2048;

/// Owns the process-lifetime signing key pair.
pub struct KeyManager {
    kid: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    public_key: RsaPublicKey,
}

impl KeyManager {
    /// Generate a fresh RSA-2048 pair with a random key identifier.
    pub fn generate() -> Result<Self, anyhow::Error> {
        let mut rng = rand::rngs::OsRng;
        let private_key = RsaPrivateKey::new(&mut rng, RSA_KEY_BITS)
            .map_err(|e| anyhow::anyhow!("Failed to generate RSA key pair: {}", e))?;
        let public_key = RsaPublicKey::from(&private_key);

        let private_pem = private_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| anyhow::anyhow!("Failed to encode private key: {}", e))?;
        let public_pem = public_key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| anyhow::anyhow!("Failed to encode public key: {}", e))?;

        let encoding_key = EncodingKey::from_rsa_pem(private_pem.as_bytes())
            .map_err(|e| anyhow::anyhow!("Failed to load signing key: {}", e))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_pem.as_bytes())
            .map_err(|e| anyhow::anyhow!("Failed to load verification key: {}", e))?;

        let kid = uuid::Uuid::new_v4().to_string();
        tracing::info!(kid = %kid, "Signing key pair generated");

        Ok(Self {
            kid,
            encoding_key,
            decoding_key,
            public_key,
        })
    }

    pub fn kid(&self) -> &str {
        &self.kid
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    /// Select the public key matching a token's key identifier.
    ///
    /// Returns None for an unknown kid; a verifier must treat that as an
    /// invalid token, not fall back to the current key.
    pub fn decoding_key_for(&self, kid: &str) -> Option<&DecodingKey> {
        (kid == self.kid).then_some(&self.decoding_key)
    }

    /// RFC 7517 JSON Web Key Set for the public half.
    pub fn jwks(&self) -> serde_json::Value {
        let n = URL_SAFE_NO_PAD.encode(self.public_key.n().to_bytes_be());
        let e = URL_SAFE_NO_PAD.encode(self.public_key.e().to_bytes_be());
        serde_json::json!({
            "keys": [{
                "kty": "RSA",
                "use": "sig",
                "alg": "RS256",
                "kid": self.kid,
                "n": n,
                "e": e,
            }]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_have_distinct_kids() {
        let a = KeyManager::generate().unwrap();
        let b = KeyManager::generate().unwrap();
        assert_ne!(a.kid(), b.kid());
    }

    #[test]
    fn jwks_exposes_the_signing_kid() {
        let keys = KeyManager::generate().unwrap();
        let jwks = keys.jwks();
        let entries = jwks["keys"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["kid"], keys.kid());
        assert_eq!(entries[0]["alg"], "RS256");
        assert!(!entries[0]["n"].as_str().unwrap().is_empty());
    }

    #[test]
    fn unknown_kid_selects_no_key() {
        let keys = KeyManager::generate().unwrap();
        assert!(keys.decoding_key_for("some-other-kid").is_none());
        assert!(keys.decoding_key_for(keys.kid()).is_some());
    }
}
