//! Registered OAuth2 client model and capability normalization.
//!
//! Capability attributes (authentication methods, grant types, redirect
//! URIs, scopes) are true sets in memory. They are rendered to a flat,
//! comma-joined text form only at the storage boundary and parsed back
//! on read, so write-then-read is set-equal regardless of input order.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Delimiter for the flattened storage rendering of a capability set.
const SET_DELIMITER: &str = ",";

/// A capability attribute value that can round-trip through text.
pub trait CapabilityValue: Ord + Clone {
    fn parse(s: &str) -> Self;
    fn as_str(&self) -> &str;
}

impl CapabilityValue for String {
    fn parse(s: &str) -> Self {
        s.to_string()
    }

    fn as_str(&self) -> &str {
        self
    }
}

/// How a registered client proves its own identity to the server.
///
/// Unrecognized values are preserved verbatim as extension methods
/// rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ClientAuthMethod {
    ClientSecretBasic,
    ClientSecretPost,
    None,
    Extension(String),
}

impl CapabilityValue for ClientAuthMethod {
    fn parse(s: &str) -> Self {
        match s {
            "client_secret_basic" => ClientAuthMethod::ClientSecretBasic,
            "client_secret_post" => ClientAuthMethod::ClientSecretPost,
            "none" => ClientAuthMethod::None,
            other => ClientAuthMethod::Extension(other.to_string()),
        }
    }

    fn as_str(&self) -> &str {
        match self {
            ClientAuthMethod::ClientSecretBasic => "client_secret_basic",
            ClientAuthMethod::ClientSecretPost => "client_secret_post",
            ClientAuthMethod::None => "none",
            ClientAuthMethod::Extension(s) => s,
        }
    }
}

impl fmt::Display for ClientAuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OAuth2 mechanism by which a client obtains a token.
///
/// Unrecognized values become extension grant types.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum GrantType {
    AuthorizationCode,
    ClientCredentials,
    RefreshToken,
    Extension(String),
}

impl CapabilityValue for GrantType {
    fn parse(s: &str) -> Self {
        match s {
            "authorization_code" => GrantType::AuthorizationCode,
            "client_credentials" => GrantType::ClientCredentials,
            "refresh_token" => GrantType::RefreshToken,
            other => GrantType::Extension(other.to_string()),
        }
    }

    fn as_str(&self) -> &str {
        match self {
            GrantType::AuthorizationCode => "authorization_code",
            GrantType::ClientCredentials => "client_credentials",
            GrantType::RefreshToken => "refresh_token",
            GrantType::Extension(s) => s,
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An order-independent, duplicate-free capability set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CapabilitySet<T: CapabilityValue>(BTreeSet<T>);

impl<T: CapabilityValue> CapabilitySet<T> {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Normalize a request list into a set: an absent list becomes the
    /// empty set, duplicates collapse silently, blank entries drop.
    pub fn normalize(values: Option<&[String]>) -> Self {
        Self(
            values
                .unwrap_or_default()
                .iter()
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(T::parse)
                .collect(),
        )
    }

    /// Parse the flattened storage rendering back into a set.
    pub fn from_storage(raw: &str) -> Self {
        Self(
            raw.split(SET_DELIMITER)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(T::parse)
                .collect(),
        )
    }

    /// Render to the flattened storage form.
    pub fn to_storage(&self) -> String {
        self.0
            .iter()
            .map(CapabilityValue::as_str)
            .collect::<Vec<_>>()
            .join(SET_DELIMITER)
    }

    /// Sorted string view for API responses.
    pub fn as_strings(&self) -> BTreeSet<String> {
        self.0.iter().map(|v| v.as_str().to_string()).collect()
    }

    pub fn contains(&self, value: &T) -> bool {
        self.0.contains(value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }
}

impl<T: CapabilityValue> FromIterator<T> for CapabilitySet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Canonical, validated client registration produced by the normalizer.
///
/// Building one has no side effects and is idempotent given identical
/// input; credentials are generated later by the registration service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRegistration {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub client_name: String,
    pub authentication_methods: CapabilitySet<ClientAuthMethod>,
    pub grant_types: CapabilitySet<GrantType>,
    pub redirect_uris: CapabilitySet<String>,
    pub post_logout_redirect_uris: CapabilitySet<String>,
    pub scopes: CapabilitySet<String>,
    pub require_authorization_consent: bool,
}

/// Raw registration input before normalization.
#[derive(Debug, Clone, Default)]
pub struct ClientRegistrationInput {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub client_name: String,
    pub client_authentication_methods: Option<Vec<String>>,
    pub authorization_grant_types: Option<Vec<String>>,
    pub redirect_uris: Option<Vec<String>>,
    pub post_logout_redirect_uris: Option<Vec<String>>,
    pub scopes: Option<Vec<String>>,
    pub require_authorization_consent: bool,
}

impl ClientRegistration {
    pub fn from_input(input: &ClientRegistrationInput) -> Self {
        Self {
            client_id: input.client_id.clone(),
            client_secret: input.client_secret.clone(),
            client_name: input.client_name.trim().to_string(),
            authentication_methods: CapabilitySet::normalize(
                input.client_authentication_methods.as_deref(),
            ),
            grant_types: CapabilitySet::normalize(input.authorization_grant_types.as_deref()),
            redirect_uris: CapabilitySet::normalize(input.redirect_uris.as_deref()),
            post_logout_redirect_uris: CapabilitySet::normalize(
                input.post_logout_redirect_uris.as_deref(),
            ),
            scopes: CapabilitySet::normalize(input.scopes.as_deref()),
            require_authorization_consent: input.require_authorization_consent,
        }
    }
}

/// Persisted client capability record. The plaintext secret is never
/// part of this record; only its algorithm-tagged hash is stored.
#[derive(Debug, Clone)]
pub struct RegisteredClient {
    pub id: Uuid,
    pub client_id: String,
    pub client_id_issued_at: DateTime<Utc>,
    pub client_secret_hash: String,
    pub client_secret_expires_at: Option<DateTime<Utc>>,
    pub client_name: String,
    pub authentication_methods: CapabilitySet<ClientAuthMethod>,
    pub grant_types: CapabilitySet<GrantType>,
    pub redirect_uris: CapabilitySet<String>,
    pub post_logout_redirect_uris: CapabilitySet<String>,
    pub scopes: CapabilitySet<String>,
    pub require_authorization_consent: bool,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl RegisteredClient {
    pub fn new(
        client_id: String,
        client_secret_hash: String,
        registration: &ClientRegistration,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            client_id,
            client_id_issued_at: now,
            client_secret_hash,
            client_secret_expires_at: None,
            client_name: registration.client_name.clone(),
            authentication_methods: registration.authentication_methods.clone(),
            grant_types: registration.grant_types.clone(),
            redirect_uris: registration.redirect_uris.clone(),
            post_logout_redirect_uris: registration.post_logout_redirect_uris.clone(),
            scopes: registration.scopes.clone(),
            require_authorization_consent: registration.require_authorization_consent,
            created_utc: now,
            updated_utc: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_with_grants(grants: &[&str]) -> ClientRegistrationInput {
        ClientRegistrationInput {
            client_name: "demo".to_string(),
            authorization_grant_types: Some(grants.iter().map(|s| s.to_string()).collect()),
            ..Default::default()
        }
    }

    #[test]
    fn duplicate_grant_types_collapse() {
        let input = input_with_grants(&[
            "authorization_code",
            "refresh_token",
            "authorization_code",
        ]);
        let reg = ClientRegistration::from_input(&input);
        assert_eq!(reg.grant_types.len(), 2);
        assert!(reg.grant_types.contains(&GrantType::AuthorizationCode));
        assert!(reg.grant_types.contains(&GrantType::RefreshToken));
    }

    #[test]
    fn normalization_is_order_independent() {
        let a = ClientRegistration::from_input(&input_with_grants(&[
            "refresh_token",
            "authorization_code",
        ]));
        let b = ClientRegistration::from_input(&input_with_grants(&[
            "authorization_code",
            "refresh_token",
        ]));
        assert_eq!(a.grant_types, b.grant_types);
    }

    #[test]
    fn absent_lists_become_empty_sets() {
        let input = ClientRegistrationInput {
            client_name: "demo".to_string(),
            ..Default::default()
        };
        let reg = ClientRegistration::from_input(&input);
        assert!(reg.grant_types.is_empty());
        assert!(reg.redirect_uris.is_empty());
        assert!(reg.scopes.is_empty());
    }

    #[test]
    fn unknown_values_are_preserved_as_extensions() {
        let input = ClientRegistrationInput {
            client_name: "demo".to_string(),
            client_authentication_methods: Some(vec!["tls_client_auth".to_string()]),
            authorization_grant_types: Some(vec!["urn:ietf:params:oauth:grant-type:device_code"
                .to_string()]),
            ..Default::default()
        };
        let reg = ClientRegistration::from_input(&input);
        assert!(reg
            .authentication_methods
            .contains(&ClientAuthMethod::Extension("tls_client_auth".to_string())));
        assert!(reg.grant_types.contains(&GrantType::Extension(
            "urn:ietf:params:oauth:grant-type:device_code".to_string()
        )));
    }

    #[test]
    fn normalization_is_idempotent() {
        let input = input_with_grants(&["client_credentials", "client_credentials"]);
        let first = ClientRegistration::from_input(&input);
        let second = ClientRegistration::from_input(&input);
        assert_eq!(first, second);
    }

    #[test]
    fn storage_round_trip_is_set_equal() {
        let set: CapabilitySet<GrantType> = CapabilitySet::normalize(Some(&[
            "refresh_token".to_string(),
            "authorization_code".to_string(),
            "refresh_token".to_string(),
        ]));
        let rendered = set.to_storage();
        let parsed = CapabilitySet::<GrantType>::from_storage(&rendered);
        assert_eq!(set, parsed);
    }

    #[test]
    fn storage_parsing_trims_and_drops_empty_tokens() {
        let parsed = CapabilitySet::<String>::from_storage(" openid , profile ,, email ,");
        assert_eq!(parsed.len(), 3);
        let strings = parsed.as_strings();
        assert!(strings.contains("openid"));
        assert!(strings.contains("profile"));
        assert!(strings.contains("email"));
    }

    #[test]
    fn extension_values_round_trip_through_storage() {
        let set: CapabilitySet<ClientAuthMethod> = CapabilitySet::normalize(Some(&[
            "private_key_jwt".to_string(),
            "client_secret_basic".to_string(),
        ]));
        let parsed = CapabilitySet::<ClientAuthMethod>::from_storage(&set.to_storage());
        assert!(parsed.contains(&ClientAuthMethod::Extension("private_key_jwt".to_string())));
        assert!(parsed.contains(&ClientAuthMethod::ClientSecretBasic));
    }
}
