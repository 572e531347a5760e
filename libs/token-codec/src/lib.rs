//! Shared JWT signing and verification for the marketplace backend.
//!
//! Tokens are compact JWS strings signed with RS256 (RSA with SHA-256).
//! Access and refresh tokens use two independent RSA key pairs so that a
//! leaked refresh key never lets an attacker mint access tokens, and so
//! that services which only validate access tokens never need to hold
//! refresh key material.
//!
//! Key material is PEM, usually transported base64-encoded through the
//! environment. Keys are parsed once at startup and held read-only inside
//! a [`TokenCodec`] for the process lifetime; there is no hot reload.
//!
//! [`TokenCodec::verify`] never returns an error for the expected failure
//! modes. Callers always get a three-way [`Verification`] outcome and
//! decide for themselves whether an expired or malformed token is fatal.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Signing algorithm for every token this codec produces. RS256 only; no
/// symmetric fallback, which rules out algorithm-confusion attacks.
const JWT_ALGORITHM: Algorithm = Algorithm::RS256;

/// Selects which of the two independent key pairs a token is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
    /// Short-lived tokens presented on every request.
    Access,
    /// Long-lived tokens used solely to mint new access tokens.
    Refresh,
}

/// Outcome of verifying a token.
///
/// `Expired` is only reported when the signature checked out; a token that
/// fails signature validation is `Malformed` regardless of its `exp`.
#[derive(Debug)]
pub enum Verification<C> {
    /// Signature and expiry both pass; carries the decoded claims.
    Valid(C),
    /// Signature passes but the expiry has elapsed.
    Expired,
    /// Bad signature, wrong key class, undecodable claims, or garbage input.
    Malformed,
}

impl<C> Verification<C> {
    /// Unwrap the claims of a valid token, discarding failure detail.
    pub fn into_claims(self) -> Option<C> {
        match self {
            Verification::Valid(claims) => Some(claims),
            _ => None,
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Verification::Expired)
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid base64 key material: {0}")]
    KeyEncoding(#[from] base64::DecodeError),

    #[error("invalid RSA PEM key material: {0}")]
    KeyMaterial(String),

    #[error("failed to sign claims: {0}")]
    Signing(String),
}

/// One RSA key pair: private half for signing, public half for verification.
struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_pem(private_pem: &str, public_pem: &str) -> Result<Self, CodecError> {
        let encoding = EncodingKey::from_rsa_pem(private_pem.as_bytes())
            .map_err(|e| CodecError::KeyMaterial(format!("private key: {e}")))?;
        let decoding = DecodingKey::from_rsa_pem(public_pem.as_bytes())
            .map_err(|e| CodecError::KeyMaterial(format!("public key: {e}")))?;
        Ok(Self { encoding, decoding })
    }
}

/// Holds both key pairs and performs all signing and verification.
pub struct TokenCodec {
    access: KeyPair,
    refresh: KeyPair,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Build a codec from plain PEM strings.
    pub fn from_pem(
        access_private_pem: &str,
        access_public_pem: &str,
        refresh_private_pem: &str,
        refresh_public_pem: &str,
    ) -> Result<Self, CodecError> {
        Ok(Self {
            access: KeyPair::from_pem(access_private_pem, access_public_pem)?,
            refresh: KeyPair::from_pem(refresh_private_pem, refresh_public_pem)?,
        })
    }

    /// Build a codec from base64-encoded PEM strings, the form the keys take
    /// in environment configuration.
    pub fn from_base64_pem(
        access_private: &str,
        access_public: &str,
        refresh_private: &str,
        refresh_public: &str,
    ) -> Result<Self, CodecError> {
        Self::from_pem(
            &decode_base64(access_private)?,
            &decode_base64(access_public)?,
            &decode_base64(refresh_private)?,
            &decode_base64(refresh_public)?,
        )
    }

    fn pair(&self, class: KeyClass) -> &KeyPair {
        match class {
            KeyClass::Access => &self.access,
            KeyClass::Refresh => &self.refresh,
        }
    }

    /// Sign a claim set into a compact JWS string.
    ///
    /// The claims struct is expected to carry its own `exp` (and usually
    /// `iat`); the codec does not inject expiry on the caller's behalf.
    pub fn sign<C: Serialize>(&self, class: KeyClass, claims: &C) -> Result<String, CodecError> {
        encode(&Header::new(JWT_ALGORITHM), claims, &self.pair(class).encoding)
            .map_err(|e| CodecError::Signing(e.to_string()))
    }

    /// Verify a token against the given key class.
    ///
    /// Expiry is checked with zero leeway so that a token is reported
    /// expired the moment its TTL elapses.
    pub fn verify<C: DeserializeOwned>(&self, class: KeyClass, token: &str) -> Verification<C> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.leeway = 0;

        match decode::<C>(token, &self.pair(class).decoding, &validation) {
            Ok(data) => Verification::Valid(data.claims),
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => Verification::Expired,
                _ => Verification::Malformed,
            },
        }
    }
}

fn decode_base64(input: &str) -> Result<String, CodecError> {
    let bytes = BASE64.decode(input.trim())?;
    String::from_utf8(bytes)
        .map_err(|_| CodecError::KeyMaterial("key material is not valid UTF-8".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_base64() {
        let err = decode_base64("not-base64!!!").unwrap_err();
        assert!(matches!(err, CodecError::KeyEncoding(_)));
    }

    #[test]
    fn rejects_non_pem_keys() {
        let err = TokenCodec::from_pem("junk", "junk", "junk", "junk").unwrap_err();
        assert!(matches!(err, CodecError::KeyMaterial(_)));
    }
}
