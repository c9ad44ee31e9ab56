pub mod client;
pub mod user;

pub use client::{
    CapabilitySet, ClientAuthMethod, ClientRegistration, GrantType, RegisteredClient,
};
pub use user::{SanitizedUser, User};
