use crate::models::client::{ClientRegistrationInput, RegisteredClient};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterClientRequest {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,

    #[validate(length(min = 1, message = "Client name is required"))]
    #[schema(example = "My Dashboard")]
    pub client_name: String,

    #[serde(default)]
    #[schema(example = "[\"client_secret_basic\"]")]
    pub client_authentication_methods: Option<Vec<String>>,

    #[serde(default)]
    #[schema(example = "[\"authorization_code\", \"refresh_token\"]")]
    pub authorization_grant_types: Option<Vec<String>>,

    #[serde(default)]
    #[schema(example = "[\"https://app.example.com/callback\"]")]
    pub redirect_uris: Option<Vec<String>>,

    #[serde(default)]
    pub post_logout_redirect_uris: Option<Vec<String>>,

    #[serde(default)]
    #[schema(example = "[\"openid\", \"profile\"]")]
    pub scopes: Option<Vec<String>>,

    #[serde(default)]
    pub require_authorization_consent: bool,
}

impl From<RegisterClientRequest> for ClientRegistrationInput {
    fn from(req: RegisterClientRequest) -> Self {
        ClientRegistrationInput {
            client_id: req.client_id,
            client_secret: req.client_secret,
            client_name: req.client_name,
            client_authentication_methods: req.client_authentication_methods,
            authorization_grant_types: req.authorization_grant_types,
            redirect_uris: req.redirect_uris,
            post_logout_redirect_uris: req.post_logout_redirect_uris,
            scopes: req.scopes,
            require_authorization_consent: req.require_authorization_consent,
        }
    }
}

/// Registration response. `client_secret` is plaintext and shown
/// exactly once; only its hash is retrievable afterwards.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterClientResponse {
    pub client_id: String,
    pub client_secret: String,
    pub client_name: String,
    pub client_authentication_methods: BTreeSet<String>,
    pub authorization_grant_types: BTreeSet<String>,
    pub redirect_uris: BTreeSet<String>,
    pub post_logout_redirect_uris: BTreeSet<String>,
    pub scopes: BTreeSet<String>,
    pub require_authorization_consent: bool,
}

impl RegisterClientResponse {
    pub fn from_registered(client: &RegisteredClient, plaintext_secret: String) -> Self {
        Self {
            client_id: client.client_id.clone(),
            client_secret: plaintext_secret,
            client_name: client.client_name.clone(),
            client_authentication_methods: client.authentication_methods.as_strings(),
            authorization_grant_types: client.grant_types.as_strings(),
            redirect_uris: client.redirect_uris.as_strings(),
            post_logout_redirect_uris: client.post_logout_redirect_uris.as_strings(),
            scopes: client.scopes.as_strings(),
            require_authorization_consent: client.require_authorization_consent,
        }
    }
}
