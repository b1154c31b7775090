use super::{DocumentStore, StoredDocument};
use crate::error::{Result, SiteError};
use crate::model::DocumentName;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("szpineta/", env!("CARGO_PKG_VERSION"));

/// Repository and credentials the remote store commits to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubTarget {
    pub api_base: String,
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub listing_path: String,
    pub summary_path: String,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    content: String,
    sha: String,
}

#[derive(Debug, Serialize)]
struct PutRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

/// Pages stored in a GitHub repository, read and committed through the
/// contents API.
pub struct GitHubStore {
    target: GitHubTarget,
    agent: ureq::Agent,
}

impl GitHubStore {
    pub fn new(target: GitHubTarget) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(target.timeout)
            .user_agent(USER_AGENT)
            .build();
        Self { target, agent }
    }

    fn path(&self, name: DocumentName) -> &str {
        match name {
            DocumentName::Listing => &self.target.listing_path,
            DocumentName::Summary => &self.target.summary_path,
        }
    }

    /// `{api}/repos/{owner}/{repo}/contents/{path}`; the path is a single encoded
    /// segment, slashes included.
    pub fn contents_url(&self, name: DocumentName) -> std::result::Result<Url, String> {
        let mut url = Url::parse(&self.target.api_base).map_err(|e| e.to_string())?;
        url.path_segments_mut()
            .map_err(|_| format!("{} cannot be a base URL", self.target.api_base))?
            .pop_if_empty()
            .extend([
                "repos",
                self.target.owner.as_str(),
                self.target.repo.as_str(),
                "contents",
                self.path(name),
            ]);
        Ok(url)
    }

    fn request(&self, method: &str, url: &Url) -> ureq::Request {
        self.agent
            .request_url(method, url)
            .set("Authorization", &format!("Bearer {}", self.target.token))
            .set("Accept", "application/vnd.github+json")
            .set("X-GitHub-Api-Version", API_VERSION)
    }
}

pub fn encode_content(content: &str) -> String {
    STANDARD.encode(content.as_bytes())
}

/// Decodes the `content` field of a contents response, which GitHub wraps with
/// newlines.
pub fn decode_content(encoded: &str) -> std::result::Result<String, String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact).map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}

/// Maps a non-success response to the error for the operation that received it.
pub fn status_error(
    document: DocumentName,
    method: &str,
    path: &str,
    status: u16,
    body: &str,
) -> SiteError {
    let reason = format!("GitHub {method} {path} failed: {status} {}", body.trim());
    match (method, status) {
        ("GET", _) => SiteError::DocumentUnavailable { document, reason },
        (_, 409) => SiteError::Conflict { document, reason },
        _ => SiteError::PersistFailed { document, reason },
    }
}

fn transport_error(
    document: DocumentName,
    method: &str,
    path: &str,
    err: impl std::fmt::Display,
) -> SiteError {
    let reason = format!("GitHub {method} {path} failed: {err}");
    if method == "GET" {
        SiteError::DocumentUnavailable { document, reason }
    } else {
        SiteError::PersistFailed { document, reason }
    }
}

impl DocumentStore for GitHubStore {
    fn fetch(&self, name: DocumentName) -> Result<StoredDocument> {
        let path = self.path(name);
        let mut url = self
            .contents_url(name)
            .map_err(|e| transport_error(name, "GET", path, e))?;
        url.query_pairs_mut().append_pair("ref", &self.target.branch);

        let response = match self.request("GET", &url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(status_error(name, "GET", path, status, &body));
            }
            Err(err) => return Err(transport_error(name, "GET", path, err)),
        };

        let parsed: ContentResponse = response
            .into_json()
            .map_err(|e| transport_error(name, "GET", path, e))?;
        let content =
            decode_content(&parsed.content).map_err(|e| transport_error(name, "GET", path, e))?;

        debug!(document = %name, bytes = content.len(), sha = %parsed.sha, "fetched from GitHub");
        Ok(StoredDocument {
            content,
            revision: Some(parsed.sha),
        })
    }

    fn persist(
        &self,
        name: DocumentName,
        content: &str,
        expected_revision: Option<&str>,
        message: &str,
    ) -> Result<()> {
        let path = self.path(name);
        let url = self
            .contents_url(name)
            .map_err(|e| transport_error(name, "PUT", path, e))?;
        let body = PutRequest {
            message,
            content: encode_content(content),
            branch: &self.target.branch,
            sha: expected_revision,
        };

        match self.request("PUT", &url).send_json(&body) {
            Ok(_) => {
                info!(document = %name, path, branch = %self.target.branch, "committed to GitHub");
                Ok(())
            }
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                Err(status_error(name, "PUT", path, status, &body))
            }
            Err(err) => Err(transport_error(name, "PUT", path, err)),
        }
    }

    fn location(&self, name: DocumentName) -> String {
        format!(
            "github:{}/{}@{}:{}",
            self.target.owner,
            self.target.repo,
            self.target.branch,
            self.path(name)
        )
    }
}
