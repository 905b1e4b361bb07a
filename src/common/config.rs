// src/common/config.rs
//! Authentication and OAuth2 configuration loaded once at startup

use base64::Engine;
use std::env;

/// Minimum decoded secret length for HS256 signing (256 bits)
const MIN_SECRET_BYTES: usize = 32;

/// Per-provider OAuth2 client credentials
#[derive(Debug, Clone)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: String,
}

/// Authentication configuration shared across the auth module
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Decoded HMAC key for access tokens and the signed OAuth2 state cookie
    pub jwt_secret: Vec<u8>,
    /// Access token lifetime in milliseconds (short by design; see tokens.rs)
    pub access_token_ttl_ms: i64,
    /// Refresh token lifetime in milliseconds
    pub refresh_token_ttl_ms: i64,
    /// Name of the HttpOnly cookie carrying the refresh token
    pub refresh_cookie_name: String,
    /// Public base URL of this server, used to build provider callback URLs
    pub public_base_url: String,
    /// Allow-listed client redirect URIs for the OAuth2 handoff
    pub authorized_redirect_uris: Vec<String>,
    pub google: Option<OAuthClientConfig>,
    pub github: Option<OAuthClientConfig>,
    pub linkedin: Option<OAuthClientConfig>,
}

impl AuthConfig {
    /// Load configuration from the environment.
    ///
    /// Fails fast when JWT_SECRET is absent, not valid base64, or decodes to
    /// fewer than 32 bytes - a weak HS256 key must never reach serving code.
    pub fn from_env() -> anyhow::Result<Self> {
        let raw_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is required (base64-encoded, >= 32 bytes decoded)"))?;

        let jwt_secret = base64::engine::general_purpose::STANDARD
            .decode(raw_secret.trim())
            .map_err(|e| anyhow::anyhow!("JWT_SECRET is not valid base64: {}", e))?;

        if jwt_secret.len() < MIN_SECRET_BYTES {
            anyhow::bail!(
                "JWT_SECRET decodes to {} bytes, need at least {}",
                jwt_secret.len(),
                MIN_SECRET_BYTES
            );
        }

        let access_token_ttl_ms = env_i64("ACCESS_TOKEN_TTL_MS", 15 * 60 * 1000);
        let refresh_token_ttl_ms = env_i64("REFRESH_TOKEN_TTL_MS", 7 * 24 * 60 * 60 * 1000);

        let refresh_cookie_name =
            env::var("REFRESH_COOKIE_NAME").unwrap_or_else(|_| "portfolio_refresh".to_string());

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());

        let authorized_redirect_uris: Vec<String> = env::var("OAUTH2_AUTHORIZED_REDIRECT_URIS")
            .unwrap_or_else(|_| "http://localhost:3000/oauth2/redirect".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            jwt_secret,
            access_token_ttl_ms,
            refresh_token_ttl_ms,
            refresh_cookie_name,
            public_base_url,
            authorized_redirect_uris,
            google: provider_config("GOOGLE_CLIENT_ID", "GOOGLE_CLIENT_SECRET"),
            github: provider_config("GITHUB_CLIENT_ID", "GITHUB_CLIENT_SECRET"),
            linkedin: provider_config("LINKEDIN_CLIENT_ID", "LINKEDIN_CLIENT_SECRET"),
        })
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(default)
}

fn provider_config(id_key: &str, secret_key: &str) -> Option<OAuthClientConfig> {
    match (env::var(id_key), env::var(secret_key)) {
        (Ok(client_id), Ok(client_secret)) if !client_id.is_empty() && !client_secret.is_empty() => {
            Some(OAuthClientConfig {
                client_id,
                client_secret,
            })
        }
        _ => None,
    }
}
