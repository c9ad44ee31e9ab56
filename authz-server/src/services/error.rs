use service_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User with email {0} already exists")]
    DuplicateUser(String),

    #[error("Client identifier is already registered")]
    DuplicateClient,

    #[error("Missing authentication token")]
    NoToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("{0} not found")]
    NotFound(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Database(e) => AppError::DatabaseError(anyhow::Error::new(e)),
            ServiceError::Internal(e) => AppError::InternalError(e),
            ServiceError::Validation(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
            ServiceError::InvalidCredentials => {
                AppError::AuthError(anyhow::anyhow!("Invalid email or password"))
            }
            // The registration endpoint answers duplicate emails with 400
            ServiceError::DuplicateUser(email) => {
                AppError::BadRequest(anyhow::anyhow!("User with email {} already exists", email))
            }
            ServiceError::DuplicateClient => {
                AppError::Conflict(anyhow::anyhow!("Client identifier is already registered"))
            }
            ServiceError::NoToken => {
                AppError::AuthError(anyhow::anyhow!("Missing authentication token"))
            }
            ServiceError::InvalidToken => {
                AppError::AuthError(anyhow::anyhow!("Invalid or expired token"))
            }
            ServiceError::NotFound(what) => {
                AppError::NotFound(anyhow::anyhow!("{} not found", what))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_credentials_maps_to_auth_error() {
        let app: AppError = ServiceError::InvalidCredentials.into();
        assert!(matches!(app, AppError::AuthError(_)));
    }

    #[test]
    fn duplicate_user_maps_to_bad_request() {
        let app: AppError = ServiceError::DuplicateUser("a@x.com".to_string()).into();
        assert!(matches!(app, AppError::BadRequest(_)));
    }

    #[test]
    fn duplicate_client_maps_to_conflict() {
        let app: AppError = ServiceError::DuplicateClient.into();
        assert!(matches!(app, AppError::Conflict(_)));
    }

    #[test]
    fn no_token_and_invalid_token_are_distinct_errors() {
        assert_ne!(
            ServiceError::NoToken.to_string(),
            ServiceError::InvalidToken.to_string()
        );
    }
}
