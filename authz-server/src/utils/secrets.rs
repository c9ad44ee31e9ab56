//! Generation of client identifiers and client secrets.
//!
//! Secrets come from the OS CSPRNG only; they are never derived from
//! timestamps, counters, or any other predictable input.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use uuid::Uuid;

/// Byte length of a generated client secret (256 bits).
const SECRET_BYTE_LENGTH: usize = 32;

/// Generate a globally unique opaque client identifier (128 bits of
/// randomness).
pub fn generate_client_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generate a cryptographically secure client secret, encoded as
/// URL-safe base64 without padding.
pub fn generate_client_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTE_LENGTH];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
