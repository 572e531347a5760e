/// Email-verification tokens
///
/// These are not session credentials: they ride in a verification link and
/// only ever flip the `verified` flag, so a symmetric secret (HS256) is
/// enough and keeps the RSA pairs reserved for session tokens.
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};

#[derive(Debug, Serialize, Deserialize)]
pub struct VerificationClaims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

pub fn issue(secret: &str, email: &str, ttl: Duration) -> Result<String> {
    let now = Utc::now();
    let claims = VerificationClaims {
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Internal(format!("failed to sign verification token: {e}")))
}

/// Decode a verification token. Expired, forged and garbled tokens all
/// come back as the same client error.
pub fn decode_token(secret: &str, token: &str) -> Result<VerificationClaims> {
    decode::<VerificationClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::TokenMalformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-verification-secret";

    #[test]
    fn issue_and_decode_roundtrip() {
        let token = issue(SECRET, "pat@example.com", Duration::hours(24)).unwrap();
        let claims = decode_token(SECRET, &token).unwrap();
        assert_eq!(claims.email, "pat@example.com");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue(SECRET, "pat@example.com", Duration::hours(24)).unwrap();
        assert!(matches!(
            decode_token("other-secret", &token),
            Err(AuthError::TokenMalformed)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = issue(SECRET, "pat@example.com", Duration::seconds(-120)).unwrap();
        assert!(matches!(
            decode_token(SECRET, &token),
            Err(AuthError::TokenMalformed)
        ));
    }
}
