//! User store. Email uniqueness is enforced by the database constraint;
//! any existence check above this layer is advisory only.

use crate::models::User;
use crate::services::ServiceError;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn insert(pool: &PgPool, user: &User) -> Result<(), ServiceError> {
    sqlx::query(
        r#"
        INSERT INTO users (user_id, name, email, password_hash, created_utc, updated_utc)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(user.user_id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.created_utc)
    .bind(user.updated_utc)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return ServiceError::DuplicateUser(user.email.clone());
            }
        }
        ServiceError::Database(e)
    })?;

    Ok(())
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, ServiceError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT user_id, name, email, password_hash, created_utc, updated_utc
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, ServiceError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT user_id, name, email, password_hash, created_utc, updated_utc
        FROM users
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}
