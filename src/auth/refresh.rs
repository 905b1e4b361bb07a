// src/auth/refresh.rs
//! Long-lived opaque refresh tokens
//!
//! A refresh token is 32 bytes of OS randomness, base64url-encoded and stored
//! as-is. Plaintext storage is a documented trade-off: 256 bits of entropy
//! plus HTTPS/HttpOnly transport stand in for server-side hashing, keeping
//! the redeem path a single indexed lookup.

use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::models::{RefreshToken, User};
use crate::common::safe_token_log;

#[derive(Debug, Error)]
pub enum RefreshTokenError {
    #[error("refresh token not found")]
    NotFound,

    #[error("refresh token expired")]
    Expired,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub struct RefreshTokenStore {
    db: SqlitePool,
    ttl: Duration,
}

impl RefreshTokenStore {
    pub fn new(db: SqlitePool, ttl_ms: i64) -> Self {
        Self {
            db,
            ttl: Duration::milliseconds(ttl_ms),
        }
    }

    /// Generate and persist a fresh token for the user.
    ///
    /// Callers rotate: `revoke_all` first so at most one live token backs an
    /// active session. The store itself does not enforce that.
    pub async fn issue(&self, user: &User) -> Result<RefreshToken, RefreshTokenError> {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes);

        let expires_at = (Utc::now() + self.ttl).to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (token, user_id, expires_at, created_at)
            VALUES (?, ?, ?, datetime('now'))
            "#,
        )
        .bind(&token)
        .bind(&user.id)
        .bind(&expires_at)
        .execute(&self.db)
        .await?;

        debug!(user_id = %user.id, token = %safe_token_log(&token), "Issued refresh token");

        Ok(RefreshToken {
            token,
            user_id: user.id.clone(),
            expires_at,
        })
    }

    /// Redeem a token for its owning user.
    ///
    /// The row is removed in the same statement that reads it, so a token can
    /// be redeemed exactly once even under concurrent requests. An expired
    /// row is likewise discarded on detection and can never be replayed.
    pub async fn redeem(&self, token: &str) -> Result<User, RefreshTokenError> {
        let row: Option<RefreshToken> = sqlx::query_as(
            "DELETE FROM refresh_tokens WHERE token = ? RETURNING token, user_id, expires_at",
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await?;

        let record = match row {
            Some(r) => r,
            None => {
                warn!(token = %safe_token_log(token), "Refresh token not found");
                return Err(RefreshTokenError::NotFound);
            }
        };

        let expires_at = DateTime::parse_from_rfc3339(&record.expires_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now() - Duration::seconds(1));

        if Utc::now() > expires_at {
            warn!(
                user_id = %record.user_id,
                token = %safe_token_log(token),
                "Refresh token expired, row discarded"
            );
            return Err(RefreshTokenError::Expired);
        }

        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(&record.user_id)
            .fetch_optional(&self.db)
            .await?;

        match user {
            Some(u) => {
                debug!(user_id = %u.id, "Refresh token redeemed");
                Ok(u)
            }
            None => {
                warn!(user_id = %record.user_id, "Refresh token owner no longer exists");
                Err(RefreshTokenError::NotFound)
            }
        }
    }

    /// Delete every refresh token owned by the user.
    /// Called on logout and password change.
    pub async fn revoke_all(&self, user_id: &str) -> Result<u64, RefreshTokenError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        let revoked = result.rows_affected();
        if revoked > 0 {
            info!(user_id = %user_id, revoked = revoked, "Revoked refresh tokens");
        }

        Ok(revoked)
    }
}
