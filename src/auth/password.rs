use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::OnceLock;

/// The hashing scheme itself failed, as opposed to a password not matching.
///
/// Carries the scheme's error text only. Plaintexts and digests never end up
/// in it.
#[derive(Debug, thiserror::Error)]
#[error("credential hashing failed: {0}")]
pub struct HashingFailure(pub String);

impl From<HashingFailure> for crate::types::AppError {
    fn from(e: HashingFailure) -> Self {
        crate::types::AppError::Hashing(e.0)
    }
}

/// One-way password hashing with Argon2id and the scheme's default cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialHasher;

impl CredentialHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hashes a password with a fresh random salt.
    ///
    /// Returns a PHC-formatted string (`$argon2id$v=19$...`).
    pub fn hash(&self, plaintext: &str) -> Result<String, HashingFailure> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| HashingFailure(e.to_string()))
    }

    /// Checks a password against a stored digest.
    ///
    /// A mismatch is `Ok(false)`. Only a digest that cannot be parsed is an
    /// error.
    pub fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, HashingFailure> {
        let parsed_hash = PasswordHash::new(digest).map_err(|e| HashingFailure(e.to_string()))?;

        match Argon2::default().verify_password(plaintext.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(HashingFailure(e.to_string())),
        }
    }

    /// Runs a full verification against a throwaway digest.
    ///
    /// Login calls this when the email is unknown so both rejection paths pay
    /// the same hashing cost.
    pub fn verify_dummy(&self, plaintext: &str) {
        static DUMMY_DIGEST: OnceLock<Option<String>> = OnceLock::new();

        let digest = DUMMY_DIGEST.get_or_init(|| self.hash("dummy-password-for-timing").ok());
        if let Some(digest) = digest {
            let _ = self.verify(plaintext, digest);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing() {
        let hasher = CredentialHasher::new();
        let password = "test_password_123";

        let hash = hasher.hash(password).expect("should hash password");

        // Hash should not equal the original password
        assert_ne!(hash, password);
        assert!(hash.starts_with("$argon2id"), "hash should be in PHC format");
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let hasher = CredentialHasher::new();

        let first = hasher.hash("secret12").expect("should hash");
        let second = hasher.hash("secret12").expect("should hash");

        assert_ne!(first, second);
    }

    #[test]
    fn test_password_verification_success() {
        let hasher = CredentialHasher::new();
        let password = "secure_password_456";

        let hash = hasher.hash(password).expect("should hash password");
        let is_valid = hasher.verify(password, &hash).expect("should verify");

        assert!(is_valid, "correct password should verify successfully");
    }

    #[test]
    fn test_password_verification_failure() {
        let hasher = CredentialHasher::new();

        let hash = hasher.hash("correct_password").expect("should hash password");
        let is_valid = hasher
            .verify("wrong_password", &hash)
            .expect("should verify");

        assert!(!is_valid, "wrong password should fail verification");
    }

    #[test]
    fn test_malformed_digest_is_a_hashing_failure() {
        let hasher = CredentialHasher::new();

        assert!(hasher.verify("secret12", "not-a-phc-string").is_err());
        assert!(hasher.verify("secret12", "").is_err());
    }

    #[test]
    fn test_verify_dummy_does_not_panic() {
        CredentialHasher::new().verify_dummy("whatever");
    }
}
