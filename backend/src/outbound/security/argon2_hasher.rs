//! Argon2id implementation of the `CredentialHasher` port.

use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;

use crate::domain::CredentialHash;
use crate::domain::ports::{CredentialHasher, CredentialHasherError};

/// Hashes passwords into PHC strings with Argon2id and a random salt.
#[derive(Clone, Default)]
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
}

impl Argon2CredentialHasher {
    /// Hasher with custom cost parameters.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialHasherError::Hashing`] when the parameters are out
    /// of range.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, CredentialHasherError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|err| CredentialHasherError::hashing(err.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, plaintext: &str) -> Result<CredentialHash, CredentialHasherError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| CredentialHash::new(hash.to_string()))
            .map_err(|err| CredentialHasherError::hashing(err.to_string()))
    }

    fn verify(
        &self,
        plaintext: &str,
        hash: &CredentialHash,
    ) -> Result<bool, CredentialHasherError> {
        let parsed = PasswordHash::new(hash.as_str())
            .map_err(|err| CredentialHasherError::malformed_hash(err.to_string()))?;
        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(CredentialHasherError::hashing(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for Argon2 hashing.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2CredentialHasher {
        Argon2CredentialHasher::with_params(1024, 1, 1).expect("valid test params")
    }

    #[rstest]
    fn hashes_are_salted_phc_strings(hasher: Argon2CredentialHasher) {
        let first = hasher.hash("123456").expect("hash");
        let second = hasher.hash("123456").expect("hash");

        assert!(first.as_str().starts_with("$argon2id$"));
        assert_ne!(first.as_str(), second.as_str());
        assert!(!first.as_str().contains("123456"));
    }

    #[rstest]
    #[case("123456", true)]
    #[case("1234567", false)]
    #[case("", false)]
    fn verify_matches_only_the_original(
        hasher: Argon2CredentialHasher,
        #[case] attempt: &str,
        #[case] expected: bool,
    ) {
        let hash = hasher.hash("123456").expect("hash");
        assert_eq!(hasher.verify(attempt, &hash).expect("verify"), expected);
    }

    #[rstest]
    fn malformed_hashes_are_reported(hasher: Argon2CredentialHasher) {
        let err = hasher
            .verify("123456", &CredentialHash::new("not-a-phc-string"))
            .expect_err("malformed");
        assert!(matches!(err, CredentialHasherError::MalformedHash { .. }));
    }

    #[rstest]
    fn default_parameters_verify_their_own_hashes() {
        let hasher = Argon2CredentialHasher::default();
        let hash = hasher.hash("s3cret!").expect("hash");
        assert!(hasher.verify("s3cret!", &hash).expect("verify"));
    }
}
