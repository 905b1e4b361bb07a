// src/auth/oauth.rs
//! OAuth2 social login handoff
//!
//! The flow spans multiple HTTP round trips with no server-side session: the
//! authorization request is serialized into a signed, 180-second cookie, read
//! back on the provider callback, and every failure in the callback phase is
//! converted into an error redirect so a browser never sees a bare 500.

use axum::{
    extract::{Extension, Path, Query},
    response::Redirect,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::cookies::{removal_cookie, session_cookie};
use super::models::{AuthProvider, Role, User};
use crate::common::{generate_raw_id, generate_user_id, safe_email_log, ApiError, AppState};
use crate::common::config::OAuthClientConfig;

/// Signed cookie carrying the pending authorization request
pub const AUTH_REQUEST_COOKIE: &str = "oauth2_auth_request";
/// Plain cookie carrying the client's desired post-login redirect
pub const REDIRECT_URI_COOKIE: &str = "oauth2_redirect_uri";
/// An unfinished flow self-cleans after this many seconds
pub const AUTH_REQUEST_TTL_SECS: i64 = 180;

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("{0} login is not configured")]
    NotConfigured(&'static str),

    #[error("redirect URI is not authorized")]
    UnauthorizedRedirectUri,

    #[error("invalid authorization request: {0}")]
    InvalidAuthRequest(String),

    #[error("provider exchange failed: {0}")]
    ExchangeFailed(String),

    #[error("provider did not supply an email address")]
    ProviderEmailMissing,

    #[error("this email is registered via {0}; use your original login method")]
    ProviderIdentityMismatch(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Explicit schema for the authorization-request cookie payload.
/// Signed as a JWT so tampering or replay after expiry both fail closed.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthRequestClaims {
    /// Provider the flow was initiated against
    pub provider: String,
    /// CSRF state nonce echoed back by the provider
    pub state: String,
    pub iat: usize,
    pub exp: usize,
}

/// Profile attributes returned by a provider's code-for-profile exchange
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    pub provider_user_id: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Static endpoint set per provider; the exchange itself is a black box
/// behind `exchange_code`.
struct ProviderEndpoints {
    authorize_url: &'static str,
    token_url: &'static str,
    userinfo_url: &'static str,
    scope: &'static str,
}

fn endpoints(provider: AuthProvider) -> Option<ProviderEndpoints> {
    match provider {
        AuthProvider::Google => Some(ProviderEndpoints {
            authorize_url: "https://accounts.google.com/o/oauth2/v2/auth",
            token_url: "https://oauth2.googleapis.com/token",
            userinfo_url: "https://www.googleapis.com/oauth2/v3/userinfo",
            scope: "openid email profile",
        }),
        AuthProvider::Github => Some(ProviderEndpoints {
            authorize_url: "https://github.com/login/oauth/authorize",
            token_url: "https://github.com/login/oauth/access_token",
            userinfo_url: "https://api.github.com/user",
            scope: "read:user user:email",
        }),
        AuthProvider::Linkedin => Some(ProviderEndpoints {
            authorize_url: "https://www.linkedin.com/oauth/v2/authorization",
            token_url: "https://www.linkedin.com/oauth/v2/accessToken",
            userinfo_url: "https://api.linkedin.com/v2/userinfo",
            scope: "openid email profile",
        }),
        AuthProvider::Local => None,
    }
}

/// Compare a requested redirect against the allow-list.
///
/// Scheme, host (case-insensitive) and port must all match one entry; path
/// and query are intentionally unconstrained to support deep-linking.
pub fn is_authorized_redirect(requested: &str, authorized: &[String]) -> bool {
    let requested_url = match reqwest::Url::parse(requested) {
        Ok(u) => u,
        Err(_) => return false,
    };

    authorized.iter().any(|entry| {
        match reqwest::Url::parse(entry) {
            Ok(allowed) => {
                allowed.scheme() == requested_url.scheme()
                    && allowed.host_str().map(|h| h.to_lowercase())
                        == requested_url.host_str().map(|h| h.to_lowercase())
                    && allowed.port_or_known_default() == requested_url.port_or_known_default()
            }
            Err(_) => false,
        }
    })
}

/// GET /oauth2/authorize/:provider - Start the social login round trip
///
/// Validates the client redirect before any side effect, stashes the
/// authorization request in a signed cookie, and bounces to the provider.
pub async fn oauth_authorize(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(provider_name): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), ApiError> {
    let state = state_lock.read().await.clone();

    let provider = AuthProvider::parse(&provider_name)
        .filter(|p| *p != AuthProvider::Local)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown provider: {}", provider_name)))?;

    let client = provider_client(&state.auth, provider)
        .ok_or_else(|| ApiError::ServiceUnavailable(format!("{} login is not configured", provider.as_str())))?;

    let endpoints = endpoints(provider)
        .ok_or_else(|| ApiError::BadRequest("provider does not support OAuth2".to_string()))?;

    // Reject the whole flow before minting any state if the redirect is not
    // on the allow-list.
    let redirect_uri = match params.get("redirect_uri") {
        Some(uri) => {
            if !is_authorized_redirect(uri, &state.auth.authorized_redirect_uris) {
                warn!(redirect_uri = %uri, "Rejected unauthorized OAuth2 redirect URI");
                return Err(ApiError::BadRequest(
                    OAuthError::UnauthorizedRedirectUri.to_string(),
                ));
            }
            uri.clone()
        }
        None => default_redirect(&state.auth.authorized_redirect_uris),
    };

    let nonce = generate_raw_id(32);
    let now = Utc::now().timestamp() as usize;
    let claims = AuthRequestClaims {
        provider: provider.as_str().to_string(),
        state: nonce.clone(),
        iat: now,
        exp: now + AUTH_REQUEST_TTL_SECS as usize,
    };

    let signed_request = state
        .token_signer
        .sign_claims(&claims)
        .map_err(|e| {
            error!(error = %e, "Failed to sign authorization request");
            ApiError::InternalServer("failed to initiate login".to_string())
        })?;

    let callback_url = callback_url(&state.auth.public_base_url, provider);

    let authorize_url = format!(
        "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&state={}",
        endpoints.authorize_url,
        urlencoding::encode(&client.client_id),
        urlencoding::encode(&callback_url),
        urlencoding::encode(endpoints.scope),
        urlencoding::encode(&nonce),
    );

    info!(
        provider = provider.as_str(),
        redirect_uri = %redirect_uri,
        "Starting OAuth2 authorization flow"
    );

    let jar = jar
        .add(session_cookie(AUTH_REQUEST_COOKIE, &signed_request, AUTH_REQUEST_TTL_SECS))
        .add(session_cookie(REDIRECT_URI_COOKIE, &redirect_uri, AUTH_REQUEST_TTL_SECS));

    Ok((jar, Redirect::to(&authorize_url)))
}

/// GET /oauth2/callback/:provider - Complete the round trip
///
/// Every failure is funneled into a redirect carrying an `error` query
/// parameter; the transient cookies are deleted on all exit paths.
pub async fn oauth_callback(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(provider_name): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let state = state_lock.read().await.clone();

    // Target for both success and failure redirects. Only an allow-listed
    // cookie value is trusted; anything else falls back to the default.
    let target = jar
        .get(REDIRECT_URI_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|uri| is_authorized_redirect(uri, &state.auth.authorized_redirect_uris))
        .unwrap_or_else(|| default_redirect(&state.auth.authorized_redirect_uris));

    let auth_request_cookie = jar.get(AUTH_REQUEST_COOKIE).map(|c| c.value().to_string());

    let jar = jar
        .remove(removal_cookie(AUTH_REQUEST_COOKIE))
        .remove(removal_cookie(REDIRECT_URI_COOKIE));

    match complete_callback(&state, &provider_name, &params, auth_request_cookie).await {
        Ok((access_token, refresh_token)) => {
            let redirect = format!(
                "{}{}token={}",
                target,
                query_separator(&target),
                urlencoding::encode(&access_token)
            );

            let jar = jar.add(session_cookie(
                &state.auth.refresh_cookie_name,
                &refresh_token,
                state.auth.refresh_token_ttl_ms / 1000,
            ));

            (jar, Redirect::to(&redirect))
        }
        Err(e) => {
            warn!(provider = %provider_name, error = %e, "OAuth2 callback failed");
            let redirect = format!(
                "{}{}error={}",
                target,
                query_separator(&target),
                urlencoding::encode(&e.to_string())
            );
            (jar, Redirect::to(&redirect))
        }
    }
}

/// The resolution phase of the callback, separated so every error funnels
/// through the single failure-redirect path in `oauth_callback`.
async fn complete_callback(
    state: &AppState,
    provider_name: &str,
    params: &HashMap<String, String>,
    auth_request_cookie: Option<String>,
) -> Result<(String, String), OAuthError> {
    let provider = AuthProvider::parse(provider_name)
        .filter(|p| *p != AuthProvider::Local)
        .ok_or_else(|| OAuthError::UnknownProvider(provider_name.to_string()))?;

    if let Some(provider_error) = params.get("error") {
        return Err(OAuthError::ExchangeFailed(provider_error.clone()));
    }

    // The stored cookie, not any server session, proves this callback belongs
    // to a flow this server initiated.
    let signed_request = auth_request_cookie
        .ok_or_else(|| OAuthError::InvalidAuthRequest("missing authorization request".to_string()))?;

    let request: AuthRequestClaims = state
        .token_signer
        .decode_claims(&signed_request)
        .map_err(|e| OAuthError::InvalidAuthRequest(format!("unreadable or expired: {}", e)))?;

    if request.provider != provider.as_str() {
        return Err(OAuthError::InvalidAuthRequest(
            "provider does not match the initiated flow".to_string(),
        ));
    }

    let returned_state = params
        .get("state")
        .ok_or_else(|| OAuthError::InvalidAuthRequest("missing state parameter".to_string()))?;
    if *returned_state != request.state {
        return Err(OAuthError::InvalidAuthRequest("state mismatch".to_string()));
    }

    let code = params
        .get("code")
        .ok_or_else(|| OAuthError::InvalidAuthRequest("missing authorization code".to_string()))?;

    let client = provider_client(&state.auth, provider)
        .ok_or(OAuthError::NotConfigured(provider.as_str()))?;

    let callback = callback_url(&state.auth.public_base_url, provider);
    let profile = exchange_code(&state.http, provider, &client, code, &callback).await?;

    let user = resolve_provider_user(&state.db, provider, &profile, &state.admin_emails).await?;

    // Rotation-on-reissue keeps at most one live refresh token per session
    state.refresh_store.revoke_all(&user.id).await.map_err(|e| {
        OAuthError::ExchangeFailed(format!("failed to rotate refresh tokens: {}", e))
    })?;
    let refresh = state.refresh_store.issue(&user).await.map_err(|e| {
        OAuthError::ExchangeFailed(format!("failed to issue refresh token: {}", e))
    })?;

    let access_token = state.token_signer.issue(&user)?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        provider = provider.as_str(),
        "OAuth2 login completed"
    );

    Ok((access_token, refresh.token))
}

/// Exchange an authorization code for profile attributes.
///
/// Treated as a black box per provider: one token POST, one userinfo GET.
/// No retries; a failed exchange simply fails the flow.
pub async fn exchange_code(
    http: &reqwest::Client,
    provider: AuthProvider,
    client: &OAuthClientConfig,
    code: &str,
    callback_url: &str,
) -> Result<ProviderProfile, OAuthError> {
    let endpoints =
        endpoints(provider).ok_or(OAuthError::UnknownProvider("LOCAL".to_string()))?;

    let token_response = http
        .post(endpoints.token_url)
        .header("Accept", "application/json")
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", client.client_id.as_str()),
            ("client_secret", client.client_secret.as_str()),
            ("redirect_uri", callback_url),
        ])
        .send()
        .await
        .map_err(|e| OAuthError::ExchangeFailed(format!("token request failed: {}", e)))?;

    if !token_response.status().is_success() {
        let status = token_response.status();
        warn!(provider = provider.as_str(), http_status = %status, "Provider token endpoint returned error");
        return Err(OAuthError::ExchangeFailed(format!(
            "token endpoint returned {}",
            status
        )));
    }

    let token_body: serde_json::Value = token_response
        .json()
        .await
        .map_err(|e| OAuthError::ExchangeFailed(format!("malformed token response: {}", e)))?;

    let access_token = token_body
        .get("access_token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| OAuthError::ExchangeFailed("no access token in response".to_string()))?;

    let userinfo_response = http
        .get(endpoints.userinfo_url)
        .bearer_auth(access_token)
        .header("Accept", "application/json")
        // GitHub rejects requests without a User-Agent
        .header("User-Agent", "portfolio-api")
        .send()
        .await
        .map_err(|e| OAuthError::ExchangeFailed(format!("userinfo request failed: {}", e)))?;

    if !userinfo_response.status().is_success() {
        return Err(OAuthError::ExchangeFailed(format!(
            "userinfo endpoint returned {}",
            userinfo_response.status()
        )));
    }

    let body: serde_json::Value = userinfo_response
        .json()
        .await
        .map_err(|e| OAuthError::ExchangeFailed(format!("malformed userinfo response: {}", e)))?;

    debug!(provider = provider.as_str(), "Parsed provider userinfo response");

    profile_from_attributes(provider, &body)
}

/// Map a provider's userinfo payload onto the common profile shape
pub fn profile_from_attributes(
    provider: AuthProvider,
    body: &serde_json::Value,
) -> Result<ProviderProfile, OAuthError> {
    let get_str =
        |key: &str| -> Option<String> { body.get(key).and_then(|v| v.as_str()).map(str::to_string) };

    let (provider_user_id, picture) = match provider {
        // GitHub ids are numeric; everyone else uses the OIDC `sub`
        AuthProvider::Github => (
            body.get("id").and_then(|v| v.as_i64()).map(|v| v.to_string()),
            get_str("avatar_url"),
        ),
        _ => (get_str("sub"), get_str("picture")),
    };

    let provider_user_id = provider_user_id
        .ok_or_else(|| OAuthError::ExchangeFailed("userinfo missing provider id".to_string()))?;

    let email = get_str("email").ok_or(OAuthError::ProviderEmailMissing)?;

    Ok(ProviderProfile {
        provider_user_id,
        email,
        name: get_str("name"),
        picture,
    })
}

/// Resolve a provider profile to a local user.
///
/// An existing user under a different provider is never silently merged:
/// that would let an attacker who controls the same email at another
/// provider hijack the account.
pub async fn resolve_provider_user(
    db: &SqlitePool,
    provider: AuthProvider,
    profile: &ProviderProfile,
    admin_emails: &HashSet<String>,
) -> Result<User, OAuthError> {
    let existing: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&profile.email)
        .fetch_optional(db)
        .await?;

    if let Some(user) = existing {
        let recorded = AuthProvider::parse(&user.provider).unwrap_or(AuthProvider::Local);
        if recorded != provider {
            warn!(
                user_id = %user.id,
                recorded_provider = %user.provider,
                attempted_provider = provider.as_str(),
                "Provider identity mismatch"
            );
            return Err(OAuthError::ProviderIdentityMismatch(recorded.as_str()));
        }

        // Existing account: refresh mutable profile fields from the provider
        sqlx::query(
            r#"
            UPDATE users SET name = COALESCE(?, name), avatar = COALESCE(?, avatar),
                updated_at = datetime('now')
            WHERE id = ?
            "#,
        )
        .bind(profile.name.as_deref())
        .bind(profile.picture.as_deref())
        .bind(&user.id)
        .execute(db)
        .await?;

        let refreshed: User = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(&user.id)
            .fetch_one(db)
            .await?;

        debug!(user_id = %refreshed.id, "Updated existing user from provider profile");
        return Ok(refreshed);
    }

    let id = generate_user_id();
    let roles = if admin_emails.contains(&profile.email.to_lowercase()) {
        format!("{},{}", Role::User.as_str(), Role::Admin.as_str())
    } else {
        Role::User.as_str().to_string()
    };

    info!(
        user_id = %id,
        email = %safe_email_log(&profile.email),
        provider = provider.as_str(),
        "Registering new user via OAuth2"
    );

    // Email ownership is attested by the provider, so the account starts
    // verified and active.
    sqlx::query(
        r#"
        INSERT INTO users (id, email, name, avatar, roles, provider, provider_id,
            email_verified, active, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, 1, 1, datetime('now'), datetime('now'))
        "#,
    )
    .bind(&id)
    .bind(&profile.email)
    .bind(profile.name.as_deref())
    .bind(profile.picture.as_deref())
    .bind(&roles)
    .bind(provider.as_str())
    .bind(&profile.provider_user_id)
    .execute(db)
    .await?;

    let user: User = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&id)
        .fetch_one(db)
        .await?;

    Ok(user)
}

fn provider_client(
    config: &crate::common::AuthConfig,
    provider: AuthProvider,
) -> Option<OAuthClientConfig> {
    match provider {
        AuthProvider::Google => config.google.clone(),
        AuthProvider::Github => config.github.clone(),
        AuthProvider::Linkedin => config.linkedin.clone(),
        AuthProvider::Local => None,
    }
}

fn callback_url(public_base_url: &str, provider: AuthProvider) -> String {
    format!(
        "{}/oauth2/callback/{}",
        public_base_url.trim_end_matches('/'),
        provider.as_str().to_lowercase()
    )
}

fn default_redirect(authorized: &[String]) -> String {
    authorized
        .first()
        .cloned()
        .unwrap_or_else(|| "http://localhost:3000".to_string())
}

fn query_separator(url: &str) -> &'static str {
    if url.contains('?') {
        "&"
    } else {
        "?"
    }
}
