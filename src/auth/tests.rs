//! Tests for the auth module
//!
//! Covers token signing and verification, refresh token redeem-once
//! semantics, redirect URI authorization, and provider profile resolution.

use axum::extract::{Extension, Path, Query};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::handlers::map_user_insert_error;
use super::models::{AuthProvider, Role, User};
use super::oauth::{
    is_authorized_redirect, oauth_authorize, oauth_callback, profile_from_attributes,
    resolve_provider_user, AuthRequestClaims, OAuthError, ProviderProfile, AUTH_REQUEST_COOKIE,
    REDIRECT_URI_COOKIE,
};
use super::refresh::{RefreshTokenError, RefreshTokenStore};
use super::tokens::TokenSigner;
use crate::common::config::{AuthConfig, OAuthClientConfig};
use crate::common::migrations::run_migrations;
use crate::common::{ApiError, AppState};
use crate::services::SettingsService;

const TEST_SECRET: &[u8] = &[0x42; 32];
const HOUR_MS: i64 = 60 * 60 * 1000;

fn test_user(id: &str, email: &str) -> User {
    User {
        id: id.to_string(),
        email: email.to_string(),
        password_hash: None,
        name: Some("Test User".to_string()),
        avatar: None,
        roles: "USER,ADMIN".to_string(),
        provider: "LOCAL".to_string(),
        provider_id: None,
        email_verified: 1,
        active: 1,
        created_at: None,
        updated_at: None,
    }
}

async fn test_pool() -> SqlitePool {
    // Single connection keeps the in-memory database alive for the test
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory database");
    run_migrations(&pool).await.expect("migrations failed");
    pool
}

async fn insert_user(pool: &SqlitePool, user: &User) {
    sqlx::query(
        r#"
        INSERT INTO users (id, email, name, roles, provider, email_verified, active)
        VALUES (?, ?, ?, ?, ?, 1, 1)
        "#,
    )
    .bind(&user.id)
    .bind(&user.email)
    .bind(user.name.as_deref())
    .bind(&user.roles)
    .bind(&user.provider)
    .execute(pool)
    .await
    .expect("failed to insert test user");
}

// ---- Token Signer ----

#[test]
fn test_issue_then_verify() {
    let signer = TokenSigner::new(TEST_SECRET, HOUR_MS).unwrap();
    let token = signer.issue(&test_user("U_TEST01", "jane@example.com")).unwrap();
    assert!(signer.verify(&token));
}

#[test]
fn test_subject_matches_user_id() {
    let signer = TokenSigner::new(TEST_SECRET, HOUR_MS).unwrap();
    let token = signer.issue(&test_user("U_TEST02", "jane@example.com")).unwrap();
    assert_eq!(signer.subject_of(&token).unwrap(), "U_TEST02");
}

#[test]
fn test_expired_token_fails_verification() {
    // Negative TTL puts the expiry in the past; zero leeway means the
    // expiration is enforced, not just structurally checked
    let signer = TokenSigner::new(TEST_SECRET, -1000).unwrap();
    let token = signer.issue(&test_user("U_TEST03", "jane@example.com")).unwrap();
    assert!(!signer.verify(&token));
}

#[test]
fn test_tampered_signature_fails_verification() {
    let signer = TokenSigner::new(TEST_SECRET, HOUR_MS).unwrap();
    let token = signer.issue(&test_user("U_TEST04", "jane@example.com")).unwrap();

    let mut tampered = token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    assert!(signer.verify(&token));
    assert!(!signer.verify(&tampered));
}

#[test]
fn test_blank_and_garbage_tokens_fail_verification() {
    let signer = TokenSigner::new(TEST_SECRET, HOUR_MS).unwrap();
    assert!(!signer.verify(""));
    assert!(!signer.verify("   "));
    assert!(!signer.verify("not.a.jwt"));
}

#[test]
fn test_wrong_key_fails_verification() {
    let signer = TokenSigner::new(TEST_SECRET, HOUR_MS).unwrap();
    let other = TokenSigner::new(&[0x43; 32], HOUR_MS).unwrap();
    let token = signer.issue(&test_user("U_TEST05", "jane@example.com")).unwrap();
    assert!(!other.verify(&token));
}

#[test]
fn test_subject_of_unparseable_token_errors() {
    let signer = TokenSigner::new(TEST_SECRET, HOUR_MS).unwrap();
    assert!(signer.subject_of("garbage").is_err());
}

#[test]
fn test_short_secret_rejected() {
    assert!(TokenSigner::new(&[0x42; 16], HOUR_MS).is_err());
}

#[test]
fn test_roles_claim_prefixed() {
    let signer = TokenSigner::new(TEST_SECRET, HOUR_MS).unwrap();
    let token = signer.issue(&test_user("U_TEST06", "jane@example.com")).unwrap();

    let claims: super::models::Claims = signer.decode_claims(&token).unwrap();
    assert_eq!(claims.roles, "ROLE_USER,ROLE_ADMIN");
    assert_eq!(claims.email, "jane@example.com");
}

#[test]
fn test_auth_request_cookie_round_trip() {
    use super::oauth::AuthRequestClaims;
    use chrono::Utc;

    let signer = TokenSigner::new(TEST_SECRET, HOUR_MS).unwrap();
    let now = Utc::now().timestamp() as usize;

    let claims = AuthRequestClaims {
        provider: "GOOGLE".to_string(),
        state: "NONCE123".to_string(),
        iat: now,
        exp: now + 180,
    };
    let signed = signer.sign_claims(&claims).unwrap();
    let decoded: AuthRequestClaims = signer.decode_claims(&signed).unwrap();
    assert_eq!(decoded.provider, "GOOGLE");
    assert_eq!(decoded.state, "NONCE123");

    // An expired authorization request must not decode
    let stale = AuthRequestClaims {
        provider: "GOOGLE".to_string(),
        state: "NONCE123".to_string(),
        iat: now - 400,
        exp: now - 200,
    };
    let signed_stale = signer.sign_claims(&stale).unwrap();
    assert!(signer.decode_claims::<AuthRequestClaims>(&signed_stale).is_err());
}

// ---- Redirect URI authorization ----

#[test]
fn test_redirect_uri_path_and_query_ignored() {
    let allowed = vec!["https://app.example.com".to_string()];
    assert!(is_authorized_redirect(
        "https://app.example.com/dashboard?x=1",
        &allowed
    ));
}

#[test]
fn test_redirect_uri_scheme_mismatch_rejected() {
    let allowed = vec!["https://app.example.com".to_string()];
    assert!(!is_authorized_redirect("http://app.example.com", &allowed));
}

#[test]
fn test_redirect_uri_host_mismatch_rejected() {
    let allowed = vec!["https://app.example.com".to_string()];
    assert!(!is_authorized_redirect("https://evil.com", &allowed));
}

#[test]
fn test_redirect_uri_host_comparison_case_insensitive() {
    let allowed = vec!["https://app.example.com".to_string()];
    assert!(is_authorized_redirect("https://APP.EXAMPLE.COM/x", &allowed));
}

#[test]
fn test_redirect_uri_port_mismatch_rejected() {
    let allowed = vec!["http://localhost:3000".to_string()];
    assert!(is_authorized_redirect("http://localhost:3000/cb", &allowed));
    assert!(!is_authorized_redirect("http://localhost:4000/cb", &allowed));
}

#[test]
fn test_redirect_uri_unparseable_rejected() {
    let allowed = vec!["https://app.example.com".to_string()];
    assert!(!is_authorized_redirect("not a url", &allowed));
    assert!(!is_authorized_redirect("", &allowed));
}

// ---- Provider profile parsing ----

#[test]
fn test_profile_from_google_attributes() {
    let body = serde_json::json!({
        "sub": "109876",
        "email": "jane@example.com",
        "name": "Jane Doe",
        "picture": "https://lh3.example.com/p.jpg"
    });
    let profile = profile_from_attributes(AuthProvider::Google, &body).unwrap();
    assert_eq!(profile.provider_user_id, "109876");
    assert_eq!(profile.email, "jane@example.com");
    assert_eq!(profile.picture.as_deref(), Some("https://lh3.example.com/p.jpg"));
}

#[test]
fn test_profile_from_github_attributes() {
    let body = serde_json::json!({
        "id": 583231,
        "email": "octo@example.com",
        "name": "Octo Cat",
        "avatar_url": "https://avatars.example.com/583231"
    });
    let profile = profile_from_attributes(AuthProvider::Github, &body).unwrap();
    assert_eq!(profile.provider_user_id, "583231");
    assert_eq!(profile.picture.as_deref(), Some("https://avatars.example.com/583231"));
}

#[test]
fn test_profile_missing_email_rejected() {
    let body = serde_json::json!({ "sub": "109876", "name": "Jane" });
    let result = profile_from_attributes(AuthProvider::Google, &body);
    assert!(matches!(result, Err(OAuthError::ProviderEmailMissing)));
}

// ---- Refresh Token Store ----

#[tokio::test]
async fn test_refresh_token_redeem_once() {
    let pool = test_pool().await;
    let user = test_user("U_RFRSH1", "refresh@example.com");
    insert_user(&pool, &user).await;

    let store = RefreshTokenStore::new(pool.clone(), HOUR_MS);
    let issued = store.issue(&user).await.unwrap();

    let redeemed = store.redeem(&issued.token).await.unwrap();
    assert_eq!(redeemed.id, user.id);

    // Second redeem of the same string fails: the row was consumed
    let second = store.redeem(&issued.token).await;
    assert!(matches!(second, Err(RefreshTokenError::NotFound)));
}

#[tokio::test]
async fn test_refresh_token_expired_and_discarded() {
    let pool = test_pool().await;
    let user = test_user("U_RFRSH2", "expired@example.com");
    insert_user(&pool, &user).await;

    let store = RefreshTokenStore::new(pool.clone(), -1000);
    let issued = store.issue(&user).await.unwrap();

    let result = store.redeem(&issued.token).await;
    assert!(matches!(result, Err(RefreshTokenError::Expired)));

    // Use-then-discard: the stale row must not remain redeemable
    let again = store.redeem(&issued.token).await;
    assert!(matches!(again, Err(RefreshTokenError::NotFound)));
}

#[tokio::test]
async fn test_refresh_token_unknown_string() {
    let pool = test_pool().await;
    let store = RefreshTokenStore::new(pool, HOUR_MS);
    let result = store.redeem("never-issued").await;
    assert!(matches!(result, Err(RefreshTokenError::NotFound)));
}

#[tokio::test]
async fn test_revoke_all_deletes_every_token() {
    let pool = test_pool().await;
    let user = test_user("U_RFRSH3", "revoke@example.com");
    insert_user(&pool, &user).await;

    let store = RefreshTokenStore::new(pool.clone(), HOUR_MS);
    let first = store.issue(&user).await.unwrap();
    let second = store.issue(&user).await.unwrap();

    let revoked = store.revoke_all(&user.id).await.unwrap();
    assert_eq!(revoked, 2);

    assert!(matches!(
        store.redeem(&first.token).await,
        Err(RefreshTokenError::NotFound)
    ));
    assert!(matches!(
        store.redeem(&second.token).await,
        Err(RefreshTokenError::NotFound)
    ));
}

#[tokio::test]
async fn test_duplicate_email_insert_maps_to_conflict() {
    let pool = test_pool().await;
    let user = test_user("U_DUP001", "dup@example.com");
    insert_user(&pool, &user).await;

    // A concurrent registration slipping past the duplicate pre-check still
    // hits the UNIQUE index; that must surface as a conflict, not a 500
    let err = sqlx::query(
        r#"
        INSERT INTO users (id, email, roles, provider, email_verified, active)
        VALUES (?, ?, 'USER', 'LOCAL', 0, 1)
        "#,
    )
    .bind("U_DUP002")
    .bind("dup@example.com")
    .execute(&pool)
    .await
    .expect_err("duplicate email must violate the unique index");

    assert!(matches!(
        map_user_insert_error(err),
        ApiError::Conflict(_)
    ));

    // Anything else stays a database error
    assert!(matches!(
        map_user_insert_error(sqlx::Error::RowNotFound),
        ApiError::DatabaseError(_)
    ));
}

// ---- OAuth2 resolution ----

fn google_profile(email: &str) -> ProviderProfile {
    ProviderProfile {
        provider_user_id: "109876".to_string(),
        email: email.to_string(),
        name: Some("Jane Doe".to_string()),
        picture: Some("https://lh3.example.com/p.jpg".to_string()),
    }
}

#[tokio::test]
async fn test_resolution_creates_new_user() {
    let pool = test_pool().await;
    let admin_emails = HashSet::new();

    let user = resolve_provider_user(
        &pool,
        AuthProvider::Google,
        &google_profile("jane@example.com"),
        &admin_emails,
    )
    .await
    .unwrap();

    assert_eq!(user.email, "jane@example.com");
    assert_eq!(user.provider, "GOOGLE");
    assert_eq!(user.role_list(), vec![Role::User]);
    assert!(user.is_active());
    assert_eq!(user.email_verified, 1);

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ?")
        .bind("jane@example.com")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 1);
}

#[tokio::test]
async fn test_resolution_rejects_provider_mismatch() {
    let pool = test_pool().await;
    let admin_emails = HashSet::new();

    resolve_provider_user(
        &pool,
        AuthProvider::Google,
        &google_profile("jane@example.com"),
        &admin_emails,
    )
    .await
    .unwrap();

    // Same email arriving via GitHub must not merge into the Google account
    let result = resolve_provider_user(
        &pool,
        AuthProvider::Github,
        &google_profile("jane@example.com"),
        &admin_emails,
    )
    .await;

    assert!(matches!(
        result,
        Err(OAuthError::ProviderIdentityMismatch("GOOGLE"))
    ));
}

#[tokio::test]
async fn test_resolution_updates_existing_profile_fields() {
    let pool = test_pool().await;
    let admin_emails = HashSet::new();

    let created = resolve_provider_user(
        &pool,
        AuthProvider::Google,
        &google_profile("jane@example.com"),
        &admin_emails,
    )
    .await
    .unwrap();

    let mut fresher = google_profile("jane@example.com");
    fresher.name = Some("Jane D. Doe".to_string());
    fresher.picture = Some("https://lh3.example.com/new.jpg".to_string());

    let updated = resolve_provider_user(&pool, AuthProvider::Google, &fresher, &admin_emails)
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name.as_deref(), Some("Jane D. Doe"));
    assert_eq!(updated.avatar.as_deref(), Some("https://lh3.example.com/new.jpg"));
}

#[tokio::test]
async fn test_resolution_grants_admin_role_from_boot_list() {
    let pool = test_pool().await;
    let mut admin_emails = HashSet::new();
    admin_emails.insert("owner@example.com".to_string());

    let user = resolve_provider_user(
        &pool,
        AuthProvider::Github,
        &ProviderProfile {
            provider_user_id: "583231".to_string(),
            email: "owner@example.com".to_string(),
            name: None,
            picture: None,
        },
        &admin_emails,
    )
    .await
    .unwrap();

    assert!(user.is_admin());
}

// ---- OAuth2 handlers ----

async fn oauth_test_state() -> Arc<RwLock<AppState>> {
    let pool = test_pool().await;

    let auth = AuthConfig {
        jwt_secret: TEST_SECRET.to_vec(),
        access_token_ttl_ms: HOUR_MS,
        refresh_token_ttl_ms: HOUR_MS,
        refresh_cookie_name: "portfolio_refresh".to_string(),
        public_base_url: "http://localhost:8080".to_string(),
        authorized_redirect_uris: vec!["http://localhost:3000/oauth2/redirect".to_string()],
        google: Some(OAuthClientConfig {
            client_id: "test-client-id".to_string(),
            client_secret: "test-client-secret".to_string(),
        }),
        github: None,
        linkedin: None,
    };

    let token_signer =
        Arc::new(TokenSigner::new(&auth.jwt_secret, auth.access_token_ttl_ms).expect("signer"));
    let refresh_store = Arc::new(RefreshTokenStore::new(pool.clone(), auth.refresh_token_ttl_ms));
    let settings_service = Arc::new(SettingsService::new(pool.clone()));

    Arc::new(RwLock::new(AppState {
        db: pool,
        http: reqwest::Client::new(),
        auth,
        admin_emails: HashSet::new(),
        token_signer,
        refresh_store,
        settings_service,
    }))
}

/// Build a jar the way axum does for an incoming request, so cookies count
/// as browser-sent originals rather than response-side additions
fn request_jar(cookies: &[(&str, &str)]) -> CookieJar {
    let mut headers = HeaderMap::new();
    let line = cookies
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("; ");
    headers.insert(header::COOKIE, line.parse().expect("cookie header"));
    CookieJar::from_headers(&headers)
}

fn location_of(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect location")
        .to_str()
        .expect("ascii location")
        .to_string()
}

#[tokio::test]
async fn test_oauth_callback_failure_redirects_with_error() {
    let state = oauth_test_state().await;

    // No cookies, no query parameters: the flow was never initiated
    let (jar, redirect) = oauth_callback(
        Extension(state),
        Path("google".to_string()),
        Query(HashMap::new()),
        CookieJar::new(),
    )
    .await;

    let response = (jar, redirect).into_response();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let location = location_of(&response);
    assert!(location.starts_with("http://localhost:3000/oauth2/redirect"));
    assert!(location.contains("error="));
    assert!(!location.contains("token="));
}

#[tokio::test]
async fn test_oauth_callback_deletes_transient_cookies() {
    let state = oauth_test_state().await;
    let jar = request_jar(&[
        (AUTH_REQUEST_COOKIE, "junk"),
        (REDIRECT_URI_COOKIE, "http://localhost:3000/oauth2/redirect"),
    ]);

    let (jar, redirect) = oauth_callback(
        Extension(state),
        Path("google".to_string()),
        Query(HashMap::new()),
        jar,
    )
    .await;

    let response = (jar, redirect).into_response();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // Both transient cookies must come back as removals even on failure
    let set_cookies: Vec<String> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().expect("ascii cookie").to_string())
        .collect();

    for name in [AUTH_REQUEST_COOKIE, REDIRECT_URI_COOKIE] {
        let removal = set_cookies
            .iter()
            .find(|c| c.starts_with(&format!("{}=", name)))
            .unwrap_or_else(|| panic!("no Set-Cookie for {}", name));
        assert!(removal.contains("Max-Age=0"), "not a removal: {}", removal);
    }
}

#[tokio::test]
async fn test_oauth_callback_rejects_provider_mismatch() {
    let state = oauth_test_state().await;

    // A flow initiated against Google must not complete on the GitHub callback
    let signed = {
        let signer = TokenSigner::new(TEST_SECRET, HOUR_MS).unwrap();
        let now = chrono::Utc::now().timestamp() as usize;
        signer
            .sign_claims(&AuthRequestClaims {
                provider: "GOOGLE".to_string(),
                state: "NONCE123".to_string(),
                iat: now,
                exp: now + 180,
            })
            .unwrap()
    };

    let mut params = HashMap::new();
    params.insert("state".to_string(), "NONCE123".to_string());
    params.insert("code".to_string(), "authcode".to_string());

    let (jar, redirect) = oauth_callback(
        Extension(state),
        Path("github".to_string()),
        Query(params),
        request_jar(&[(AUTH_REQUEST_COOKIE, &signed)]),
    )
    .await;

    let response = (jar, redirect).into_response();
    let location = location_of(&response);
    assert!(location.contains("error="));
    assert!(location.contains("provider%20does%20not%20match"));
    assert!(!location.contains("token="));
}

#[tokio::test]
async fn test_oauth_callback_ignores_unlisted_redirect_cookie() {
    let state = oauth_test_state().await;
    let jar = request_jar(&[(REDIRECT_URI_COOKIE, "http://evil.example/phish")]);

    let (jar, redirect) = oauth_callback(
        Extension(state),
        Path("google".to_string()),
        Query(HashMap::new()),
        jar,
    )
    .await;

    let response = (jar, redirect).into_response();
    let location = location_of(&response);
    assert!(location.starts_with("http://localhost:3000/oauth2/redirect"));
    assert!(!location.contains("evil.example"));
}

#[tokio::test]
async fn test_oauth_authorize_rejects_unlisted_redirect_uri() {
    let state = oauth_test_state().await;

    let mut params = HashMap::new();
    params.insert(
        "redirect_uri".to_string(),
        "http://evil.example/phish".to_string(),
    );

    let result = oauth_authorize(
        Extension(state),
        Path("google".to_string()),
        Query(params),
        CookieJar::new(),
    )
    .await;

    match result {
        Err(ApiError::BadRequest(message)) => {
            assert_eq!(message, "redirect URI is not authorized");
        }
        other => panic!("expected bad request, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_oauth_authorize_sets_state_cookie_and_redirects_to_provider() {
    let state = oauth_test_state().await;

    let (jar, redirect) = oauth_authorize(
        Extension(state),
        Path("google".to_string()),
        Query(HashMap::new()),
        CookieJar::new(),
    )
    .await
    .unwrap();

    let response = (jar, redirect).into_response();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let location = location_of(&response);
    assert!(location.starts_with("https://accounts.google.com/o/oauth2/v2/auth"));
    assert!(location.contains("client_id=test-client-id"));
    assert!(location.contains("state="));

    let set_cookies: Vec<String> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().expect("ascii cookie").to_string())
        .collect();
    assert!(set_cookies
        .iter()
        .any(|c| c.starts_with(&format!("{}=", AUTH_REQUEST_COOKIE))));
    assert!(set_cookies
        .iter()
        .any(|c| c.starts_with(&format!("{}=", REDIRECT_URI_COOKIE))));
}
