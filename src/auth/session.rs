use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::auth::jwt::SESSION_TTL;

pub const SESSION_COOKIE: &str = "auth-token";

/// HTTP-only, same-site strict cookie carrying the session token.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(SESSION_TTL)
        .build()
}

pub fn session_token(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value())
        .filter(|v| !v.is_empty())
}

/// Drops the session cookie on the client. The token itself stays valid
/// until it expires.
pub fn clear_session(jar: CookieJar) -> CookieJar {
    let mut removal = Cookie::from(SESSION_COOKIE);
    removal.set_path("/");
    jar.remove(removal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::COOKIE, HeaderMap, HeaderValue};

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("tok".into(), true);
        let rendered = cookie.to_string();
        assert!(rendered.starts_with("auth-token=tok"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("SameSite=Strict"));
        assert!(rendered.contains("Secure"));
        assert!(rendered.contains("Max-Age=604800"));
    }

    #[test]
    fn development_cookie_is_not_secure() {
        let rendered = session_cookie("tok".into(), false).to_string();
        assert!(!rendered.contains("Secure"));
    }

    #[test]
    fn reads_token_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; auth-token=abc"));
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(session_token(&jar), Some("abc"));

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("auth-token="));
        assert_eq!(session_token(&CookieJar::from_headers(&headers)), None);
    }
}
