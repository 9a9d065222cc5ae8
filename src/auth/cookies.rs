//! Session cookie handling
//!
//! The session token travels in an HTTP-only `token` cookie, accompanied by
//! a non-HTTP-only `checkToken` presence cookie the front end reads to know
//! a session exists without seeing the token itself. Both carry an 8-hour
//! transport lifetime; the signed payload inside expires much sooner and is
//! refreshed on each authenticated query.
//!
//! Extraction never rejects a request: an absent or invalid cookie just
//! leaves the request context unauthenticated, and each private resolver
//! decides whether that is an error.

use crate::auth::jwt::{Claims, TokenService};

/// Transport-level cookie lifetime (seconds)
const COOKIE_MAX_AGE_SECONDS: u64 = 8 * 3600;

/// Decoded session payload attached to each GraphQL request
#[derive(Clone, Default)]
pub struct Session(pub Option<Claims>);

impl Session {
    /// Build the request session from a raw Cookie header.
    ///
    /// Invalid or expired tokens yield an unauthenticated session, not an
    /// error; enforcement happens in the resolvers.
    pub fn from_cookie_header(tokens: &TokenService, header: Option<&str>) -> Self {
        let claims = extract_token(header).and_then(|t| tokens.verify(&t).ok());
        Session(claims)
    }
}

/// Cookie attributes shared by the token pair
#[derive(Clone, Debug, Default)]
pub struct CookieSettings {
    pub domain: Option<String>,
}

/// Pull the `token` cookie value out of a raw Cookie header
pub fn extract_token(header: Option<&str>) -> Option<String> {
    let header = header?;
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == "token" && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Set-Cookie values issuing a new session: the HTTP-only token plus the
/// script-visible presence marker
pub fn session_cookies(settings: &CookieSettings, token: &str) -> Vec<String> {
    vec![
        format!(
            "token={}; {}Path=/; Max-Age={}; Secure; HttpOnly; SameSite=None",
            token,
            domain_attr(settings),
            COOKIE_MAX_AGE_SECONDS
        ),
        format!(
            "checkToken=true; {}Path=/; Max-Age={}; Secure; SameSite=None",
            domain_attr(settings),
            COOKIE_MAX_AGE_SECONDS
        ),
    ]
}

/// Set-Cookie values expiring both cookies (logout)
pub fn clear_cookies(settings: &CookieSettings) -> Vec<String> {
    vec![
        format!(
            "token=; {}Path=/; Max-Age=0; Secure; HttpOnly; SameSite=None",
            domain_attr(settings)
        ),
        format!(
            "checkToken=; {}Path=/; Max-Age=0; Secure; SameSite=None",
            domain_attr(settings)
        ),
    ]
}

fn domain_attr(settings: &CookieSettings) -> String {
    settings
        .domain
        .as_ref()
        .map(|d| format!("Domain={}; ", d))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_token_from_cookie_header() {
        let header = "checkToken=true; token=abc.def.ghi; other=1";
        assert_eq!(extract_token(Some(header)), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn check_token_cookie_is_not_mistaken_for_token() {
        // "checkToken=" must not match a lookup for "token="
        assert_eq!(extract_token(Some("checkToken=true")), None);
        assert_eq!(extract_token(None), None);
        assert_eq!(extract_token(Some("token=")), None);
    }

    #[test]
    fn session_cookie_pair_has_expected_attributes() {
        let settings = CookieSettings {
            domain: Some("devlink.example".to_string()),
        };
        let cookies = session_cookies(&settings, "tok");

        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].starts_with("token=tok;"));
        assert!(cookies[0].contains("HttpOnly"));
        assert!(cookies[0].contains("Domain=devlink.example"));
        assert!(cookies[0].contains("SameSite=None"));
        // presence cookie stays readable by the front end
        assert!(cookies[1].starts_with("checkToken=true;"));
        assert!(!cookies[1].contains("HttpOnly"));
    }

    #[test]
    fn clear_cookies_expire_both() {
        let cookies = clear_cookies(&CookieSettings::default());
        assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
    }

    #[test]
    fn invalid_token_yields_unauthenticated_session() {
        let tokens = TokenService::new("secret".to_string(), 1800, 600);
        let session = Session::from_cookie_header(&tokens, Some("token=not-a-jwt"));
        assert!(session.0.is_none());
    }
}
