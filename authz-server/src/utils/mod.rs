pub mod password;
pub mod secrets;

pub use password::{hash_password, verify_password, Password, PasswordHashString};
pub use secrets::{generate_client_id, generate_client_secret};
