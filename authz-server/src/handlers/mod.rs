pub mod auth;
pub mod clients;
pub mod user;
pub mod well_known;
