//! Clinic login passwords, stored as Argon2id PHC strings.

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::error::ClinicDeskError;

/// Hash `password` with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, ClinicDeskError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ClinicDeskError::PasswordHash(e.to_string()))
}

/// Verify half of [`hash_password`]: checks a clinic password against its stored hash.
/// The clinic apps log in against these hashes; the admin dashboard only writes them.
///
/// Returns `Ok(false)` on mismatch and an error only for a malformed stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ClinicDeskError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| ClinicDeskError::PasswordHash(format!("invalid hash format: {e}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(ClinicDeskError::PasswordHash(format!("verify error: {e}"))),
    }
}
