use super::auth;
use super::pages;
use super::response::{status_for, text_error, AddResponse, ApiError};
use super::submission;
use super::SharedState;
use crate::commands::helpers::parse_poem_number;
use crate::error::{Result, SiteError};
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::header::{ALLOW, CACHE_CONTROL, CONTENT_TYPE, HOST};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use std::io::Read;
use tracing::{info, warn};

const CACHE_ONE_DAY: &str = "public, max-age=86400";
const MAX_ASSET_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct PoemQuery {
    pub poem: Option<String>,
}

/// Runs store and render work off the async runtime.
async fn blocking<T, F>(state: &SharedState, work: F) -> Result<T>
where
    F: FnOnce(&super::AppState) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = SharedState::clone(state);
    tokio::task::spawn_blocking(move || work(&state))
        .await
        .map_err(|e| SiteError::Io(std::io::Error::other(e.to_string())))?
}

fn noindex(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert("x-robots-tag", HeaderValue::from_static("noindex, nofollow"));
    response
}

fn header<'h>(headers: &'h HeaderMap, name: impl axum::http::header::AsHeaderName) -> &'h str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// `scheme://host` the request was addressed to.
fn base_url(headers: &HeaderMap, port: u16) -> String {
    let scheme = match header(headers, "x-forwarded-proto") {
        "" => "http",
        proto => proto.split(',').next().unwrap_or("http").trim(),
    };
    match header(headers, HOST) {
        "" => format!("{scheme}://localhost:{port}"),
        host => format!("{scheme}://{host}"),
    }
}

/// Basic auth for `/admin` is enforced by [`super::statics::guard_admin`].
pub async fn admin_form() -> Response {
    noindex(Html(pages::ADMIN_FORM).into_response())
}

pub async fn admin_add(State(state): State<SharedState>, body: Bytes) -> Response {
    let submission = submission::from_form(&body);
    let response = match blocking(&state, move |s| s.add_local(&submission)).await {
        Ok(result) => Html(pages::added_fragment(&result)).into_response(),
        Err(e) => {
            warn!(error = %e, "admin submission failed");
            (status_for(e.kind()), Html(pages::error_fragment(&e))).into_response()
        }
    };
    noindex(response)
}

pub async fn api_add(
    State(state): State<SharedState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method != Method::POST {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(ALLOW, "POST")],
            Json(serde_json::json!({ "error": "Method Not Allowed" })),
        )
            .into_response();
    }
    if let Err(e) = auth::check_bearer(&headers, state.config.admin.token.as_deref()) {
        return ApiError(e).into_response();
    }
    if let Err(e) = state.remote() {
        return ApiError(e).into_response();
    }

    let submission = match submission::parse(header(&headers, CONTENT_TYPE), &body) {
        Ok(s) => s,
        Err(e) => return ApiError(e).into_response(),
    };

    match blocking(&state, move |s| s.add_remote(&submission)).await {
        Ok(result) => match AddResponse::from_result(&result) {
            Some(body) => Json(body).into_response(),
            None => ApiError(SiteError::Io(std::io::Error::other("no result"))).into_response(),
        },
        Err(e) => ApiError(e).into_response(),
    }
}

pub async fn share_page(
    State(state): State<SharedState>,
    Query(query): Query<PoemQuery>,
    headers: HeaderMap,
) -> Response {
    let base = base_url(&headers, state.config.port);
    let outcome = blocking(&state, move |s| {
        s.local().share_page(query.poem.as_deref(), &base)
    })
    .await;

    match outcome.map(|r| r.page) {
        Ok(Some(page)) => Html(page).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => text_error(e),
    }
}

pub async fn poem_card(State(state): State<SharedState>, Query(query): Query<PoemQuery>) -> Response {
    let number = match parse_poem_number(query.poem.as_deref()) {
        Ok(n) => n,
        Err(e) => return text_error(e),
    };

    match blocking(&state, move |s| s.local().poem_card(number)).await {
        Ok(result) => match result.image {
            Some(png) => (
                [(CONTENT_TYPE, "image/png"), (CACHE_CONTROL, CACHE_ONE_DAY)],
                png,
            )
                .into_response(),
            None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        },
        Err(e) => text_error(e),
    }
}

enum Upstream {
    Asset { content_type: String, bytes: Vec<u8> },
    Status(u16),
}

fn fetch_asset(agent: &ureq::Agent, url: &str) -> std::result::Result<Upstream, String> {
    let response = match agent.get(url).call() {
        Ok(response) => response,
        Err(ureq::Error::Status(status, _)) => return Ok(Upstream::Status(status)),
        Err(e) => return Err(e.to_string()),
    };
    let content_type = response
        .header("content-type")
        .unwrap_or("application/octet-stream")
        .to_string();
    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_ASSET_BYTES)
        .read_to_end(&mut bytes)
        .map_err(|e| e.to_string())?;
    Ok(Upstream::Asset {
        content_type,
        bytes,
    })
}

/// Streams the release asset through the site so browsers avoid cross-origin
/// redirects.
pub async fn asset_proxy(State(state): State<SharedState>) -> Response {
    let agent = state.proxy.clone();
    let url = state.config.asset_url.clone();
    let outcome = tokio::task::spawn_blocking(move || fetch_asset(&agent, &url)).await;

    match outcome {
        Ok(Ok(Upstream::Asset {
            content_type,
            bytes,
        })) => {
            info!(bytes = bytes.len(), "proxied asset");
            (
                [
                    (CONTENT_TYPE, content_type),
                    (CACHE_CONTROL, CACHE_ONE_DAY.to_string()),
                ],
                bytes,
            )
                .into_response()
        }
        Ok(Ok(Upstream::Status(status))) => {
            let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (code, format!("GitHub release: {status}")).into_response()
        }
        Ok(Err(e)) => {
            warn!(error = %e, "asset proxy failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Proxy error").into_response()
        }
        Err(e) => {
            warn!(error = %e, "asset proxy task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Proxy error").into_response()
        }
    }
}
