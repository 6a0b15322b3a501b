//! Password hashing using Argon2id
//!
//! Hashes are stored as PHC strings, which carry the salt and the cost
//! parameters alongside the hash.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use zeroize::Zeroizing;

use crate::error::{BalanceError, BalanceResult};

/// A password held in memory, wiped on drop
pub type SecretPassword = Zeroizing<String>;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> BalanceResult<String> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(BalanceError::Auth(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| BalanceError::Auth(format!("Failed to hash password: {}", e)))
}

/// Check a password against a stored PHC string
///
/// Returns `Ok(false)` for a wrong password and an error when the stored
/// hash itself is unreadable.
pub fn verify_password(password: &str, phc: &str) -> BalanceResult<bool> {
    let parsed = PasswordHash::new(phc)
        .map_err(|e| BalanceError::Config(format!("Stored password hash is invalid: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(BalanceError::Auth(format!("Failed to verify password: {}", e))),
    }
}

/// Read a password from the terminal without echo
pub fn prompt_password(prompt: &str) -> BalanceResult<SecretPassword> {
    rpassword::prompt_password(prompt)
        .map(Zeroizing::new)
        .map_err(|e| BalanceError::Io(format!("Failed to read password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("correct horse").unwrap();
        let second = hash_password("correct horse").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(hash_password("short").unwrap_err(), BalanceError::Auth(_)));
    }

    #[test]
    fn test_invalid_stored_hash() {
        assert!(matches!(
            verify_password("anything", "not a phc string").unwrap_err(),
            BalanceError::Config(_)
        ));
    }

    #[test]
    fn test_secret_password_derefs() {
        let secret: SecretPassword = Zeroizing::new("hunter2hunter2".to_string());
        assert_eq!(secret.len(), 14);
    }
}
