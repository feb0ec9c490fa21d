//! Password hashing and verification using bcrypt
//!
//! Uses cost factor 10 to stay hash-compatible with credentials created by
//! earlier deployments of this service.

use crate::types::GatewayError;

/// bcrypt cost factor for newly created credentials
pub const BCRYPT_COST: u32 = 10;

/// Hash a password with bcrypt
///
/// Returns the salted hash string in modular crypt format.
pub fn hash_password(password: &str) -> Result<String, GatewayError> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| GatewayError::Auth(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored hash
///
/// Returns true if the password matches the hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, GatewayError> {
    bcrypt::verify(password, hash)
        .map_err(|e| GatewayError::Auth(format!("Invalid password hash format: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).unwrap();

        // Hash should be in modular crypt format, never the plaintext
        assert!(hash.starts_with("$2"));
        assert_ne!(hash, password);

        // Correct password should verify
        assert!(verify_password(password, &hash).unwrap());

        // Wrong password should not verify
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_different_salts() {
        let password = "same-password";
        let hash1 = hash_password(password).unwrap();
        let hash2 = hash_password(password).unwrap();

        // Same password should produce different hashes (different salts)
        assert_ne!(hash1, hash2);

        // Both should verify
        assert!(verify_password(password, &hash1).unwrap());
        assert!(verify_password(password, &hash2).unwrap());
    }

    #[test]
    fn test_cost_factor_embedded() {
        let hash = hash_password("p1").unwrap();
        assert!(hash.contains("$10$"));
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = verify_password("password", "not-a-valid-hash");
        assert!(result.is_err());
    }
}
