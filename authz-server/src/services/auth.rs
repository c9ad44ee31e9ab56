use crate::{
    db,
    models::User,
    services::{IssuedToken, JwtService, ServiceError},
    utils::{hash_password, verify_password, Password, PasswordHashString},
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// An authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub email: String,
}

/// Anything that can turn an identity/secret pair into a principal.
/// Alternate credential sources plug in here without touching token
/// issuance.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, identity: &str, secret: &str) -> Result<Principal, ServiceError>;
}

/// Password verification against the user store.
pub struct PasswordCredentialVerifier {
    pool: PgPool,
    dummy_hash: PasswordHashString,
}

impl PasswordCredentialVerifier {
    pub fn new(pool: PgPool) -> Result<Self, ServiceError> {
        // Hashed once up front; the unknown-identity path verifies against
        // this so both failure paths cost a comparable amount of work.
        let dummy_hash = hash_password(&Password::new(
            "enumeration-resistance-placeholder".to_string(),
        ))
        .map_err(ServiceError::Internal)?;

        Ok(Self { pool, dummy_hash })
    }
}

#[async_trait]
impl CredentialVerifier for PasswordCredentialVerifier {
    async fn verify(&self, identity: &str, secret: &str) -> Result<Principal, ServiceError> {
        let user = db::users::find_by_email(&self.pool, identity).await?;

        match user {
            Some(user) => {
                verify_password(
                    &Password::new(secret.to_string()),
                    &PasswordHashString::new(user.password_hash.clone()),
                )
                .map_err(|_| ServiceError::InvalidCredentials)?;

                Ok(Principal {
                    id: user.user_id,
                    email: user.email,
                })
            }
            None => {
                let _ = verify_password(&Password::new(secret.to_string()), &self.dummy_hash);
                Err(ServiceError::InvalidCredentials)
            }
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    verifier: Arc<dyn CredentialVerifier>,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(pool: PgPool, verifier: Arc<dyn CredentialVerifier>, jwt: JwtService) -> Self {
        Self {
            pool,
            verifier,
            jwt,
        }
    }

    /// Register a new user. The database unique constraint on email is
    /// the authoritative duplicate guard; the lookup below only provides
    /// a friendlier fast path.
    pub async fn register(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> Result<User, ServiceError> {
        if db::users::find_by_email(&self.pool, &email).await?.is_some() {
            return Err(ServiceError::DuplicateUser(email));
        }

        let password_hash = hash_password(&Password::new(password))
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Password hashing error: {}", e)))?;

        let user = User::new(name, email, password_hash.into_string());
        db::users::insert(&self.pool, &user).await?;

        tracing::info!(user_id = %user.user_id, "User registered");

        Ok(user)
    }

    /// Verify credentials. Unknown email and wrong password produce the
    /// identical error value.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Principal, ServiceError> {
        self.verifier.verify(email, password).await
    }

    /// Authenticate and issue a signed token for the principal.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(Principal, IssuedToken), ServiceError> {
        let principal = self.authenticate(email, password).await?;
        let issued = self.jwt.issue(&principal)?;

        tracing::info!(user_id = %principal.id, "Login successful");

        Ok((principal, issued))
    }

    pub async fn find_user(&self, user_id: Uuid) -> Result<User, ServiceError> {
        db::users::find_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User".to_string()))
    }
}
