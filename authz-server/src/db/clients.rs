//! Client registry store.
//!
//! Capability sets cross this boundary as flat, comma-joined text
//! columns; the domain model on either side only ever sees typed sets.
//! The `client_id` uniqueness constraint is the authoritative collision
//! guard.

use crate::models::client::{CapabilitySet, RegisteredClient};
use crate::services::ServiceError;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Flat row shape as persisted.
#[derive(Debug, FromRow)]
struct ClientRow {
    id: Uuid,
    client_id: String,
    client_id_issued_at: DateTime<Utc>,
    client_secret_hash: String,
    client_secret_expires_at: Option<DateTime<Utc>>,
    client_name: String,
    client_authentication_methods: String,
    authorization_grant_types: String,
    redirect_uris: String,
    post_logout_redirect_uris: String,
    scopes: String,
    require_authorization_consent: bool,
    created_utc: DateTime<Utc>,
    updated_utc: DateTime<Utc>,
}

impl From<ClientRow> for RegisteredClient {
    fn from(row: ClientRow) -> Self {
        RegisteredClient {
            id: row.id,
            client_id: row.client_id,
            client_id_issued_at: row.client_id_issued_at,
            client_secret_hash: row.client_secret_hash,
            client_secret_expires_at: row.client_secret_expires_at,
            client_name: row.client_name,
            authentication_methods: CapabilitySet::from_storage(
                &row.client_authentication_methods,
            ),
            grant_types: CapabilitySet::from_storage(&row.authorization_grant_types),
            redirect_uris: CapabilitySet::from_storage(&row.redirect_uris),
            post_logout_redirect_uris: CapabilitySet::from_storage(
                &row.post_logout_redirect_uris,
            ),
            scopes: CapabilitySet::from_storage(&row.scopes),
            require_authorization_consent: row.require_authorization_consent,
            created_utc: row.created_utc,
            updated_utc: row.updated_utc,
        }
    }
}

pub async fn insert(pool: &PgPool, client: &RegisteredClient) -> Result<(), ServiceError> {
    sqlx::query(
        r#"
        INSERT INTO clients (
            id, client_id, client_id_issued_at, client_secret_hash,
            client_secret_expires_at, client_name,
            client_authentication_methods, authorization_grant_types,
            redirect_uris, post_logout_redirect_uris, scopes,
            require_authorization_consent, created_utc, updated_utc
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        "#,
    )
    .bind(client.id)
    .bind(&client.client_id)
    .bind(client.client_id_issued_at)
    .bind(&client.client_secret_hash)
    .bind(client.client_secret_expires_at)
    .bind(&client.client_name)
    .bind(client.authentication_methods.to_storage())
    .bind(client.grant_types.to_storage())
    .bind(client.redirect_uris.to_storage())
    .bind(client.post_logout_redirect_uris.to_storage())
    .bind(client.scopes.to_storage())
    .bind(client.require_authorization_consent)
    .bind(client.created_utc)
    .bind(client.updated_utc)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return ServiceError::DuplicateClient;
            }
        }
        ServiceError::Database(e)
    })?;

    Ok(())
}

pub async fn find_by_client_id(
    pool: &PgPool,
    client_id: &str,
) -> Result<Option<RegisteredClient>, ServiceError> {
    let row = sqlx::query_as::<_, ClientRow>(
        r#"
        SELECT id, client_id, client_id_issued_at, client_secret_hash,
               client_secret_expires_at, client_name,
               client_authentication_methods, authorization_grant_types,
               redirect_uris, post_logout_redirect_uris, scopes,
               require_authorization_consent, created_utc, updated_utc
        FROM clients
        WHERE client_id = $1
        "#,
    )
    .bind(client_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(RegisteredClient::from))
}
