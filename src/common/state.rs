// Application state shared across all modules

use reqwest::Client;
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::sync::Arc;

use crate::auth::{RefreshTokenStore, TokenSigner};
use crate::common::config::AuthConfig;
use crate::services::SettingsService;

/// Application state containing database pool, services, and configuration
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub http: Client,
    pub auth: AuthConfig,
    /// Emails granted the ADMIN role when their account is first created
    pub admin_emails: HashSet<String>,
    pub token_signer: Arc<TokenSigner>,
    pub refresh_store: Arc<RefreshTokenStore>,
    pub settings_service: Arc<SettingsService>,
}
