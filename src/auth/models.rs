//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Roles a user can hold. Stored comma-joined in the users.roles column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "USER" => Some(Role::User),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Identity provider a user authenticated through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthProvider {
    Local,
    Google,
    Github,
    Linkedin,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Local => "LOCAL",
            AuthProvider::Google => "GOOGLE",
            AuthProvider::Github => "GITHUB",
            AuthProvider::Linkedin => "LINKEDIN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "LOCAL" => Some(AuthProvider::Local),
            "GOOGLE" => Some(AuthProvider::Google),
            "GITHUB" => Some(AuthProvider::Github),
            "LINKEDIN" => Some(AuthProvider::Linkedin),
            _ => None,
        }
    }
}

/// User database model
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub roles: String,
    pub provider: String,
    pub provider_id: Option<String>,
    pub email_verified: i64,
    pub active: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl User {
    pub fn role_list(&self) -> Vec<Role> {
        self.roles.split(',').filter_map(Role::parse).collect()
    }

    pub fn is_admin(&self) -> bool {
        self.role_list().contains(&Role::Admin)
    }

    pub fn is_active(&self) -> bool {
        self.active != 0
    }
}

/// Derived security principal attached to a request after authentication.
/// Deliberately separate from the User row so persistence changes never
/// leak into request handling.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub roles: Vec<Role>,
}

impl CurrentUser {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            roles: user.role_list(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}

/// JWT claims structure for access tokens
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    /// Comma-joined role names, each prefixed ROLE_
    pub roles: String,
    pub iat: usize,
    pub exp: usize,
}

/// Refresh token database model
#[derive(FromRow, Debug, Clone)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: String,
    pub expires_at: String,
}

/// Local signup payload
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

/// Local login payload
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
