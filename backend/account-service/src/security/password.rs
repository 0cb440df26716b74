/// Secret hashing and verification using Argon2id
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{ApiError, ApiResult};

/// Hash a secret using the Argon2id algorithm with a fresh random salt.
///
/// Used for account passwords and for OTP codes; returns a PHC-formatted
/// string safe for database storage.
pub fn hash_password(secret: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?
        .to_string();

    Ok(hash)
}

/// Verify a secret against its stored PHC hash.
///
/// Returns `Ok(false)` on a plain mismatch; malformed hashes and backend
/// failures surface as errors.
pub fn verify_password(secret: &str, stored_hash: &str) -> ApiResult<bool> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|e| ApiError::Internal(format!("Invalid password hash format: {}", e)))?;

    match Argon2::default().verify_password(secret.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(ApiError::Internal(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "secret1";
        let hash = hash_password(password).expect("should hash password successfully");
        assert_ne!(hash, password);
        assert!(verify_password(password, &hash).expect("should verify successfully"));
    }

    #[test]
    fn test_verify_wrong_password() {
        let hash = hash_password("secret1").expect("should hash password successfully");
        assert!(!verify_password("wrongpass", &hash).expect("verification should succeed"));
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let password = "secret1";
        let hash1 = hash_password(password).expect("should hash successfully");
        let hash2 = hash_password(password).expect("should hash successfully");
        // Different salts should produce different hashes
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_hash_and_verify_otp() {
        let hash = hash_password("4821").expect("should hash OTP successfully");
        assert!(verify_password("4821", &hash).expect("should verify successfully"));
        assert!(!verify_password("0000", &hash).expect("verification should succeed"));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(verify_password("secret1", "not-a-phc-string").is_err());
    }
}
