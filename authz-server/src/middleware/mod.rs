pub mod auth;

pub use auth::{auth_middleware, authenticate_request, resolve_bearer_token, AuthUser, AUTH_COOKIE};
