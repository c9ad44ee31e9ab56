use crate::{
    db,
    models::client::{ClientRegistration, ClientRegistrationInput, RegisteredClient},
    services::ServiceError,
    utils::{generate_client_id, generate_client_secret, hash_password, Password},
};
use sqlx::PgPool;

/// Registration result carrying the plaintext secret. This is the only
/// place the plaintext ever exists; it is returned to the caller once
/// and is not recoverable afterwards.
pub struct RegisteredClientWithSecret {
    pub client: RegisteredClient,
    pub client_secret: String,
}

#[derive(Clone)]
pub struct ClientService {
    pool: PgPool,
}

impl ClientService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Normalize a registration, mint credentials, and persist it.
    ///
    /// A collision on a generated identifier is retried once with a
    /// fresh identifier; a collision on a caller-supplied identifier is
    /// surfaced as `DuplicateClient`. Rows are never overwritten.
    pub async fn register_client(
        &self,
        input: &ClientRegistrationInput,
    ) -> Result<RegisteredClientWithSecret, ServiceError> {
        let registration = ClientRegistration::from_input(input);

        if registration.client_name.is_empty() {
            return Err(ServiceError::Validation(
                "clientName is required".to_string(),
            ));
        }

        let id_was_generated = registration.client_id.is_none();
        let mut client_id = registration
            .client_id
            .clone()
            .unwrap_or_else(generate_client_id);

        let client_secret = registration
            .client_secret
            .clone()
            .unwrap_or_else(generate_client_secret);

        let client_secret_hash = hash_password(&Password::new(client_secret.clone()))
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Secret hashing error: {}", e)))?
            .into_string();

        let mut retried = false;
        loop {
            let record =
                RegisteredClient::new(client_id.clone(), client_secret_hash.clone(), &registration);

            match db::clients::insert(&self.pool, &record).await {
                Ok(()) => {
                    tracing::info!(client_id = %record.client_id, "Client registered");
                    return Ok(RegisteredClientWithSecret {
                        client: record,
                        client_secret,
                    });
                }
                Err(ServiceError::DuplicateClient) if id_was_generated && !retried => {
                    tracing::warn!(client_id = %client_id, "Generated client id collided, retrying");
                    retried = true;
                    client_id = generate_client_id();
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn find_by_client_id(
        &self,
        client_id: &str,
    ) -> Result<RegisteredClient, ServiceError> {
        db::clients::find_by_client_id(&self.pool, client_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Client".to_string()))
    }
}
