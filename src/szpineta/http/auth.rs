//! Static-secret authentication for the admin form and the publishing API.

use crate::config::AdminConfig;
use crate::error::{Result, SiteError};
use axum::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::warn;

pub const REALM: &str = "szpineta-admin";

fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
}

/// `Authorization: Basic` credentials as `(user, password)`.
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = authorization(headers)?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

pub fn check_basic(headers: &HeaderMap, admin: &AdminConfig) -> Result<()> {
    match basic_credentials(headers) {
        Some((user, pass)) if user == admin.user && pass == admin.pass => Ok(()),
        Some((user, _)) => {
            warn!(%user, "rejected admin credentials");
            Err(SiteError::Unauthorized)
        }
        None => Err(SiteError::Unauthorized),
    }
}

/// Checks `Authorization: Bearer <token>`. Without a configured token every
/// request is rejected.
pub fn check_bearer(headers: &HeaderMap, expected: Option<&str>) -> Result<()> {
    let Some(expected) = expected.filter(|t| !t.is_empty()) else {
        warn!("publishing API called but no admin token is configured");
        return Err(SiteError::Unauthorized);
    };
    let provided = authorization(headers)
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .unwrap_or("");
    if !provided.is_empty() && provided == expected {
        Ok(())
    } else {
        Err(SiteError::Unauthorized)
    }
}

/// 401 asking the browser for Basic credentials.
pub fn basic_challenge() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(WWW_AUTHENTICATE, format!("Basic realm=\"{REALM}\""))],
        "Unauthorized",
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(auth: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(auth).unwrap());
        headers
    }

    fn basic(user: &str, pass: &str) -> HeaderMap {
        headers(&format!("Basic {}", STANDARD.encode(format!("{user}:{pass}"))))
    }

    #[test]
    fn accepts_configured_basic_credentials() {
        let admin = AdminConfig::default();
        assert!(check_basic(&basic("admin", "changeme"), &admin).is_ok());
        assert!(check_basic(&basic("admin", "wrong"), &admin).is_err());
        assert!(check_basic(&HeaderMap::new(), &admin).is_err());
    }

    #[test]
    fn password_may_contain_colons() {
        let admin = AdminConfig {
            pass: "a:b".into(),
            ..AdminConfig::default()
        };
        assert!(check_basic(&basic("admin", "a:b"), &admin).is_ok());
    }

    #[test]
    fn malformed_basic_header_is_rejected() {
        let admin = AdminConfig::default();
        assert!(check_basic(&headers("Basic !!!"), &admin).is_err());
        assert!(check_basic(&headers("Bearer changeme"), &admin).is_err());
    }

    #[test]
    fn bearer_token() {
        assert!(check_bearer(&headers("Bearer sekret"), Some("sekret")).is_ok());
        assert!(check_bearer(&headers("Bearer  sekret "), Some("sekret")).is_ok());
        assert!(check_bearer(&headers("Bearer nope"), Some("sekret")).is_err());
        assert!(check_bearer(&headers("sekret"), Some("sekret")).is_err());
    }

    #[test]
    fn unconfigured_token_rejects_everything() {
        assert!(check_bearer(&headers("Bearer "), None).is_err());
        assert!(check_bearer(&headers("Bearer x"), Some("")).is_err());
    }

    #[test]
    fn challenge_names_realm() {
        let response = basic_challenge();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers()[WWW_AUTHENTICATE],
            "Basic realm=\"szpineta-admin\""
        );
    }
}
