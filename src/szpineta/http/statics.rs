//! Site-root file serving and the `/admin` guard.
//!
//! Both work on the decoded, normalised request path, so percent-encoding,
//! doubled slashes and `.` segments resolve to the same file `ServeDir` would
//! open. The config file holds credentials and is never served.

use super::auth;
use super::SharedState;
use crate::config::CONFIG_FILENAME;
use axum::extract::{Request, State};
use axum::http::{StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::{Path, PathBuf};
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tracing::{debug, warn};

const ADMIN_SEGMENT: &str = "admin";

/// Characters escaped when a path segment is written back into a URI.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Decoded path segments relative to the site root. `None` when the path does
/// not decode or climbs above the root.
pub fn site_segments(path: &str) -> Option<Vec<String>> {
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    let mut segments = Vec::new();
    for segment in decoded.split(|c: char| c == '/' || c == '\\') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            s => segments.push(s.to_string()),
        }
    }
    Some(segments)
}

fn resolve(root: &Path, segments: &[String]) -> PathBuf {
    segments.iter().fold(root.to_path_buf(), |path, s| path.join(s))
}

fn is_admin(segments: &[String]) -> bool {
    segments
        .first()
        .is_some_and(|s| s.eq_ignore_ascii_case(ADMIN_SEGMENT))
}

async fn is_config(root: &Path, segments: &[String]) -> bool {
    if let [name] = segments {
        if name.eq_ignore_ascii_case(CONFIG_FILENAME) {
            return true;
        }
    }
    let requested = tokio::fs::canonicalize(resolve(root, segments)).await;
    let config = tokio::fs::canonicalize(root.join(CONFIG_FILENAME)).await;
    matches!((requested, config), (Ok(a), Ok(b)) if a == b)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|meta| meta.is_file())
}

/// `/poems` → `/poems.html` when only the `.html` file exists.
async fn html_fallback(root: &Path, segments: &[String]) -> Option<Uri> {
    let last = segments.last()?;
    if last.contains('.') || is_file(&resolve(root, segments)).await {
        return None;
    }
    let mut html = resolve(root, segments);
    html.set_extension("html");
    if !is_file(&html).await {
        return None;
    }

    let encoded: Vec<String> = segments
        .iter()
        .map(|s| utf8_percent_encode(s, SEGMENT).to_string())
        .collect();
    format!("/{}.html", encoded.join("/")).parse().ok()
}

/// Requires Basic credentials for every path under `/admin`.
pub async fn guard_admin(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    let admin = site_segments(request.uri().path()).is_some_and(|s| is_admin(&s));
    if admin && auth::check_basic(request.headers(), &state.config.admin).is_err() {
        return auth::basic_challenge();
    }
    next.run(request).await
}

/// Serves files under the site root.
pub async fn serve_file(State(state): State<SharedState>, request: Request) -> Response {
    let root = state.site_root.as_path();
    let Some(segments) = site_segments(request.uri().path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if is_config(root, &segments).await {
        warn!(path = %request.uri().path(), "refused request for the config file");
        return StatusCode::NOT_FOUND.into_response();
    }

    let request = match html_fallback(root, &segments).await {
        Some(uri) => {
            debug!(from = %request.uri(), to = %uri, "serving html page");
            let (mut parts, body) = request.into_parts();
            parts.uri = uri;
            Request::from_parts(parts, body)
        }
        None => request,
    };

    match ServeDir::new(root).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_and_normalises() {
        let expected = Some(vec!["szpineta.json".to_string()]);
        assert_eq!(site_segments("/szpineta.json"), expected);
        assert_eq!(site_segments("/%73zpineta.json"), expected);
        assert_eq!(site_segments("/szpineta%2Ejson"), expected);
        assert_eq!(site_segments("//szpineta.json"), expected);
        assert_eq!(site_segments("/./szpineta.json"), expected);
        assert_eq!(site_segments("/css/../szpineta.json"), expected);
        assert_eq!(site_segments("/css%2F..%2Fszpineta.json"), expected);
    }

    #[test]
    fn rejects_paths_above_root() {
        assert_eq!(site_segments("/../etc/passwd"), None);
        assert_eq!(site_segments("/%2e%2e/etc"), None);
        assert_eq!(site_segments("/%ff"), None);
        assert_eq!(site_segments("/"), Some(vec![]));
    }

    #[test]
    fn admin_prefix() {
        let admin = |p: &str| is_admin(&site_segments(p).unwrap());
        assert!(admin("/admin"));
        assert!(admin("/admin/"));
        assert!(admin("/Admin/secret.html"));
        assert!(admin("/%61dmin/x"));
        assert!(!admin("/administrator"));
        assert!(!admin("/poems.html"));
    }

    #[tokio::test]
    async fn config_detection_follows_the_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "{}").unwrap();
        std::fs::create_dir(dir.path().join("css")).unwrap();

        let config = |p: &str| site_segments(p).unwrap();
        assert!(is_config(dir.path(), &config("/SZPINETA.JSON")).await);
        assert!(is_config(dir.path(), &config("/szpineta.json")).await);
        assert!(!is_config(dir.path(), &config("/css/szpineta.json")).await);
        assert!(!is_config(dir.path(), &config("/index.html")).await);
    }

    #[tokio::test]
    async fn html_fallback_only_for_missing_extensionless_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("poems.html"), "x").unwrap();
        std::fs::write(dir.path().join("notes"), "x").unwrap();
        std::fs::write(dir.path().join("notes.html"), "x").unwrap();

        let fallback = |p: &str| site_segments(p).unwrap();
        assert_eq!(
            html_fallback(dir.path(), &fallback("/poems")).await,
            Some(Uri::from_static("/poems.html"))
        );
        assert_eq!(html_fallback(dir.path(), &fallback("/notes")).await, None);
        assert_eq!(html_fallback(dir.path(), &fallback("/poems.html")).await, None);
        assert_eq!(html_fallback(dir.path(), &fallback("/missing")).await, None);
        assert_eq!(html_fallback(dir.path(), &fallback("/")).await, None);
    }
}
