//! Driven port for one-way password hashing.

use crate::domain::CredentialHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised by credential hashers.
    pub enum CredentialHasherError {
        /// The hashing primitive failed to produce a hash.
        Hashing { message: String } => "password hashing failed: {message}",
        /// A stored hash could not be parsed.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// One-way hash with a verify contract.
///
/// Implementations must compare in constant time and must never log the
/// plaintext.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Hash `plaintext` with a fresh salt.
    fn hash(&self, plaintext: &str) -> Result<CredentialHash, CredentialHasherError>;

    /// Whether `plaintext` matches `hash`.
    fn verify(&self, plaintext: &str, hash: &CredentialHash)
    -> Result<bool, CredentialHasherError>;
}
