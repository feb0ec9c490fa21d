//! JWT token generation for login sessions
//!
//! Tokens are stateless: they carry the email and an expiry timestamp, are
//! signed with HS256, and are never persisted server-side. No route on this
//! surface validates them; they exist for downstream consumers.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::GatewayError;

/// Claims carried inside a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User email (the unique account key)
    pub email: String,
    /// Expiration timestamp (seconds since epoch)
    pub exp: u64,
    /// Issued-at timestamp (seconds since epoch)
    pub iat: u64,
}

/// Signs and decodes session tokens with a shared HS256 secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_seconds: u64,
}

impl TokenIssuer {
    /// Create an issuer from the configured secret and expiry
    pub fn new(secret: &str, expiry_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry_seconds,
        }
    }

    /// Generate a signed token for the given email
    pub fn generate_token(&self, email: &str) -> Result<String, GatewayError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| GatewayError::Auth(format!("System clock error: {e}")))?
            .as_secs();

        let claims = Claims {
            email: email.to_string(),
            exp: now + self.expiry_seconds,
            iat: now,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| GatewayError::Auth(format!("Failed to sign token: {e}")))
    }

    /// Decode and verify a token's signature and expiry
    pub fn decode_token(&self, token: &str) -> Result<Claims, GatewayError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| GatewayError::Auth(format!("Invalid token: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_decode() {
        let issuer = TokenIssuer::new("test-secret", 3600);
        let token = issuer.generate_token("a@x.com").unwrap();

        assert!(!token.is_empty());

        let claims = issuer.decode_token(&token).unwrap();
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = TokenIssuer::new("secret-a", 3600);
        let other = TokenIssuer::new("secret-b", 3600);

        let token = issuer.generate_token("a@x.com").unwrap();
        assert!(other.decode_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // jsonwebtoken's default validation has 60s leeway, so issue a token
        // that expired well in the past.
        let issuer = TokenIssuer::new("test-secret", 3600);
        let claims = Claims {
            email: "a@x.com".to_string(),
            exp: 1_000_000,
            iat: 1_000_000,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(issuer.decode_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let issuer = TokenIssuer::new("test-secret", 3600);
        assert!(issuer.decode_token("not.a.token").is_err());
    }
}
