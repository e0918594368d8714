//! Password hashing and strength policy.

use anyhow::{Result, anyhow};
use argon2::password_hash::rand_core::OsRng;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};

use crate::error::ValidationError;

pub const MIN_PASSWORD_LEN: usize = 8;

/// At least [`MIN_PASSWORD_LEN`] characters with one letter and one digit.
pub fn check_strength(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= MIN_PASSWORD_LEN;
    let has_letter = password.chars().any(char::is_alphabetic);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if long_enough && has_letter && has_digit {
        Ok(())
    } else {
        Err(ValidationError::WeakPassword {
            min_len: MIN_PASSWORD_LEN,
        })
    }
}

/// Hash a password with Argon2 and a fresh salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("Failed to hash password: {}", e))
}

/// Verify a password against a stored PHC hash string
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Stored password hash is unreadable: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("moon2moon").unwrap();
        assert!(verify_password("moon2moon", &hash));
        assert!(!verify_password("moon2mars", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything1", "not-a-phc-string"));
    }

    #[test]
    fn strength_policy() {
        assert!(check_strength("short1").is_err());
        assert!(check_strength("onlyletters").is_err());
        assert!(check_strength("12345678").is_err());
        assert!(check_strength("letters4ever").is_ok());
    }
}
