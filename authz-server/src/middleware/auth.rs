//! Bearer token resolution and the authentication middleware.
//!
//! A token is accepted from exactly two channels, in order: a
//! well-formed `Authorization: Bearer` header, then the `auth_token`
//! cookie. Query parameters and form bodies are never consulted; both
//! leak tokens into logs and browser history.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    services::{AccessTokenClaims, ServiceError},
    AppState,
};
use service_core::error::AppError;

/// Name of the cookie carrying the session token.
pub const AUTH_COOKIE: &str = "auth_token";

/// Extract a bearer token from the request headers.
///
/// Returns None when neither channel carries a token; that is the
/// anonymous case, not an error. A malformed Authorization header does
/// not shadow the cookie.
pub fn resolve_bearer_token(headers: &HeaderMap) -> Option<String> {
    let header_token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = header_token {
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(AUTH_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// Resolve and verify the request's token.
///
/// Absence (`NoToken`) and verification failure (`InvalidToken`) are
/// distinct outcomes so the boundary can choose 401 vs anonymous
/// handling.
pub fn authenticate_request(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<AccessTokenClaims, ServiceError> {
    let token = resolve_bearer_token(headers).ok_or(ServiceError::NoToken)?;
    state.jwt.verify(&token)
}

/// Middleware requiring an authenticated principal.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path().to_string();

    let claims = authenticate_request(&state, req.headers()).map_err(|e| {
        tracing::warn!(path = %path, reason = %e, "Authentication failed");
        AppError::from(e)
    })?;

    // Handlers read the verified claims from request extensions
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Extractor for the verified claims placed by `auth_middleware`.
pub struct AuthUser(pub AccessTokenClaims);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<AccessTokenClaims>()
            .ok_or_else(|| {
                AppError::InternalError(anyhow::anyhow!(
                    "Auth claims missing from request extensions"
                ))
            })?;

        Ok(AuthUser(claims.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.append(
                axum::http::header::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        headers
    }

    #[test]
    fn header_token_is_resolved() {
        let headers = headers_with(&[("authorization", "Bearer abc.def.ghi")]);
        assert_eq!(resolve_bearer_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn cookie_token_is_resolved_when_header_absent() {
        let headers = headers_with(&[("cookie", "auth_token=cookie.tok.en; theme=dark")]);
        assert_eq!(
            resolve_bearer_token(&headers).as_deref(),
            Some("cookie.tok.en")
        );
    }

    #[test]
    fn header_takes_precedence_over_cookie() {
        let headers = headers_with(&[
            ("authorization", "Bearer header.tok.en"),
            ("cookie", "auth_token=cookie.tok.en"),
        ]);
        assert_eq!(
            resolve_bearer_token(&headers).as_deref(),
            Some("header.tok.en")
        );
    }

    #[test]
    fn malformed_header_falls_back_to_cookie() {
        let headers = headers_with(&[
            ("authorization", "Basic dXNlcjpwdw=="),
            ("cookie", "auth_token=cookie.tok.en"),
        ]);
        assert_eq!(
            resolve_bearer_token(&headers).as_deref(),
            Some("cookie.tok.en")
        );
    }

    #[test]
    fn empty_bearer_value_is_not_a_token() {
        let headers = headers_with(&[("authorization", "Bearer ")]);
        assert_eq!(resolve_bearer_token(&headers), None);
    }

    #[test]
    fn no_channels_means_anonymous() {
        assert_eq!(resolve_bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn unrelated_cookies_are_ignored() {
        let headers = headers_with(&[("cookie", "session=legacy; theme=dark")]);
        assert_eq!(resolve_bearer_token(&headers), None);
    }
}
