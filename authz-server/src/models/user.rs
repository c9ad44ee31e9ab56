//! User model - end-user accounts authenticated by password.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// User entity. The password hash is a self-describing, algorithm-tagged
/// string (PHC `$argon2id$...` or legacy `$2b$...`).
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            user_id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            created_utc: now,
            updated_utc: now,
        }
    }

    /// Convert to sanitized response (no credential material).
    pub fn sanitized(&self) -> SanitizedUser {
        SanitizedUser {
            id: self.user_id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// User view safe to return to callers.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SanitizedUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}
