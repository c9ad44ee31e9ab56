//! Services layer: business logic for user registration, credential
//! verification, token issuance, and client registration.

mod auth;
mod clients;
pub mod error;
mod jwt;
mod keys;

pub use auth::{AuthService, CredentialVerifier, PasswordCredentialVerifier, Principal};
pub use clients::{ClientService, RegisteredClientWithSecret};
pub use error::ServiceError;
pub use jwt::{AccessTokenClaims, IssuedToken, JwtService};
pub use keys::KeyManager;
