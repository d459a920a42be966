//! JWT issuance and verification

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::AuthContext;

/// Token lifetime. Clients are expected to re-login after expiry.
const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    Encode(String),

    #[error("Invalid or expired token")]
    Invalid,
}

/// Claims carried in every access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i32,
    pub email: String,
    pub org_id: i32,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies HS256 access tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a token for an authenticated user
    pub fn generate_token(
        &self,
        user_id: i32,
        email: &str,
        org_id: i32,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            org_id,
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    /// Verify a token and return the authentication context it carries
    pub fn verify_token(&self, token: &str) -> Result<AuthContext, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| TokenError::Invalid)?;

        Ok(AuthContext {
            user_id: data.claims.sub,
            email: data.claims.email,
            org_id: data.claims.org_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let service = TokenService::new("test-secret");

        let token = service
            .generate_token(42, "user@example.com", 7)
            .expect("token should encode");

        let ctx = service.verify_token(&token).expect("token should verify");
        assert_eq!(ctx.user_id, 42);
        assert_eq!(ctx.email, "user@example.com");
        assert_eq!(ctx.org_id, 7);
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let issuer = TokenService::new("secret-a");
        let verifier = TokenService::new("secret-b");

        let token = issuer.generate_token(1, "user@example.com", 1).unwrap();

        assert!(matches!(
            verifier.verify_token(&token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let service = TokenService::new("test-secret");
        assert!(matches!(
            service.verify_token("not.a.token"),
            Err(TokenError::Invalid)
        ));
    }
}
