// src/auth/tokens.rs
//! Stateless access token signing and verification
//!
//! Access tokens are self-contained HS256 JWTs: validity is decided by
//! signature and expiry alone, never by a database lookup. The flip side is
//! that an access token cannot be revoked before it expires, so the TTL is
//! kept short (minutes) and revocability lives in the refresh token store.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use tracing::warn;

use super::models::{Claims, User};
use crate::common::safe_token_log;

/// Minimum decoded key length for HS256 (256 bits)
const MIN_KEY_BYTES: usize = 32;

pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenSigner {
    /// Build a signer from an already-decoded secret.
    ///
    /// Rejects keys shorter than 256 bits so a truncated or misconfigured
    /// secret is caught at startup instead of weakening every session.
    pub fn new(secret: &[u8], ttl_ms: i64) -> anyhow::Result<Self> {
        if secret.len() < MIN_KEY_BYTES {
            anyhow::bail!(
                "signing secret is {} bytes, need at least {} for HS256",
                secret.len(),
                MIN_KEY_BYTES
            );
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl: Duration::milliseconds(ttl_ms),
        })
    }

    /// Issue a signed access token for the user
    pub fn issue(&self, user: &User) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let roles = user
            .role_list()
            .iter()
            .map(|r| format!("ROLE_{}", r.as_str()))
            .collect::<Vec<_>>()
            .join(",");

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            roles,
            iat: now.timestamp() as usize,
            exp: (now + self.ttl).timestamp() as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    /// Verify a token string.
    ///
    /// Every failure mode is logged with its own reason but surfaced
    /// uniformly as `false`; callers must never learn why a token failed.
    pub fn verify(&self, token: &str) -> bool {
        if token.trim().is_empty() {
            warn!("Token verification failed: empty token");
            return false;
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(_) => true,
            Err(e) => {
                let token_log = safe_token_log(token);
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        warn!(token = %token_log, "Token verification failed: expired")
                    }
                    ErrorKind::InvalidSignature => {
                        warn!(token = %token_log, "Token verification failed: bad signature")
                    }
                    ErrorKind::InvalidAlgorithm => {
                        warn!(token = %token_log, "Token verification failed: unsupported algorithm")
                    }
                    _ => {
                        warn!(token = %token_log, error = %e, "Token verification failed: malformed token")
                    }
                }
                false
            }
        }
    }

    /// Extract the subject (user id) from a token.
    ///
    /// The signature is still checked but expiry is not; callers are expected
    /// to have run `verify` first or to accept the error on garbage input.
    pub fn subject_of(&self, token: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims.sub)
    }

    /// Sign an arbitrary serializable claim set with this signer's key.
    /// Used for the short-lived OAuth2 authorization-request cookie.
    pub fn sign_claims<T: serde::Serialize>(
        &self,
        claims: &T,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
    }

    /// Decode and validate a claim set signed by `sign_claims`.
    pub fn decode_claims<T: serde::de::DeserializeOwned>(
        &self,
        token: &str,
    ) -> Result<T, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<T>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}
