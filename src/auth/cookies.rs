// src/auth/cookies.rs
//! Cookie construction helpers
//!
//! All auth cookies are HttpOnly, path "/", SameSite=Lax. Attributes are
//! rendered into the header string directly so no extra time/duration types
//! leak into the call sites.

use axum_extra::extract::cookie::Cookie;

/// Build an HttpOnly cookie with a bounded lifetime
pub fn session_cookie(name: &str, value: &str, max_age_secs: i64) -> Cookie<'static> {
    let raw = format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
        name, value, max_age_secs
    );
    Cookie::parse(raw)
        .unwrap_or_else(|_| Cookie::new(name.to_string(), value.to_string()))
        .into_owned()
}

/// Build a cookie that instructs the browser to delete `name`
pub fn removal_cookie(name: &str) -> Cookie<'static> {
    let mut cookie = Cookie::new(name.to_string(), "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("portfolio_refresh", "abc123", 180);
        assert_eq!(cookie.name(), "portfolio_refresh");
        assert_eq!(cookie.value(), "abc123");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(
            cookie.max_age().map(|d| d.whole_seconds()),
            Some(180)
        );
    }

    #[test]
    fn test_removal_cookie() {
        let cookie = removal_cookie("oauth2_auth_request");
        assert_eq!(cookie.name(), "oauth2_auth_request");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.path(), Some("/"));
    }
}
