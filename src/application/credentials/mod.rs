//! Credential checking: per-identity secret hashing and the validator.

mod secret_hash;
mod validator;

pub use secret_hash::{verify_secret, SecretHashError, SecretHasher};
pub use validator::CredentialValidator;
