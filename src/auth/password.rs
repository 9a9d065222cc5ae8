//! Password hashing for account credentials
//!
//! Argon2id with library defaults, stored as PHC strings so the salt and
//! parameters travel with the hash. Hashing happens at registration and
//! password reset; verification only at login.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::types::DevLinkError;

/// Hash a password into a PHC string with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, DevLinkError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DevLinkError::Internal(format!("Failed to hash password: {e}")))
}

/// Check a candidate password against a stored PHC hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, DevLinkError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| DevLinkError::Internal(format!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::pwreset::password_policy_error;

    #[test]
    fn policy_passing_passwords_round_trip() {
        // Anything the signup policy admits must hash and verify
        for password in ["Abcd1234!", "xY9?abcd", "A long Pass-phrase 42"] {
            assert_eq!(password_policy_error(password), None);

            let hash = hash_password(password).unwrap();
            assert!(hash.starts_with("$argon2id$"));
            assert!(verify_password(password, &hash).unwrap());
        }
    }

    #[test]
    fn near_miss_candidates_are_rejected() {
        let hash = hash_password("Abcd1234!").unwrap();

        assert!(!verify_password("Abcd1234?", &hash).unwrap());
        assert!(!verify_password("abcd1234!", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn salts_make_repeat_hashes_differ() {
        let first = hash_password("Same-Pass1").unwrap();
        let second = hash_password("Same-Pass1").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("Same-Pass1", &first).unwrap());
        assert!(verify_password("Same-Pass1", &second).unwrap());
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        // A non-PHC value in the hash column is corruption, not a mismatch
        assert!(verify_password("Abcd1234!", "plaintext-from-a-bad-import").is_err());
    }
}
