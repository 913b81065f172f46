//! argon2id password hashing for admin credentials.
//!
//! Both functions are CPU-bound; callers run them on the blocking pool.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use super::credentials::CredentialError;

/// Hash `password` into a PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| CredentialError::Hash(e.to_string()))
}

/// Check `password` against a stored PHC string.
///
/// A wrong password is [`CredentialError::Mismatch`]; a stored value that
/// is not a PHC string is [`CredentialError::Hash`].
pub fn verify_password(password: &str, stored: &str) -> Result<(), CredentialError> {
    let phc = PasswordHash::new(stored).map_err(|e| CredentialError::Hash(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &phc) {
        Ok(()) => Ok(()),
        Err(argon2::password_hash::Error::Password) => Err(CredentialError::Mismatch),
        Err(e) => Err(CredentialError::Hash(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let phc = hash_password("mysecret").unwrap();
        assert!(phc.starts_with("$argon2id$"));
        assert!(verify_password("mysecret", &phc).is_ok());
        assert!(matches!(
            verify_password("wrongpassword", &phc),
            Err(CredentialError::Mismatch)
        ));
    }

    #[test]
    fn same_password_different_salts() {
        let first = hash_password("password1").unwrap();
        let second = hash_password("password1").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("password1", &second).is_ok());
    }

    #[test]
    fn unparsable_stored_hash() {
        assert!(matches!(
            verify_password("x", "not-a-phc-string"),
            Err(CredentialError::Hash(_))
        ));
    }
}
