//! Authentication module
//!
//! JWT access tokens, opaque refresh tokens, request extractors, and the
//! OAuth2 social login handoff.

pub mod cookies;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod oauth;
pub mod refresh;
pub mod routes;
pub mod tokens;

#[cfg(test)]
mod tests;

pub use extractors::{AdminUser, AuthedUser};
pub use models::User;
pub use refresh::{RefreshTokenError, RefreshTokenStore};
pub use routes::auth_routes;
pub use tokens::TokenSigner;
