//! # HTTP Server
//!
//! An axum front end over [`SiteApi`]. Handlers do request parsing, auth and
//! response shaping only; store access and rendering run on the blocking pool.
//!
//! | Route                  | Store  | Auth   |
//! |------------------------|--------|--------|
//! | `GET /admin`           |        | Basic  |
//! | `POST /admin/add-poem` | local  | Basic  |
//! | `POST /api/add-poem`   | GitHub | Bearer |
//! | `GET /poems.html`      | local  |        |
//! | `GET /poem-image.png`  | local  |        |
//! | `GET /api/lawendamodel`|        |        |
//!
//! Everything else is served from the site root as static files (see
//! [`statics`]), and every path under `/admin` sits behind Basic auth.
//!
//! Submissions are serialized through a single lock shared by both publishing
//! routes, so two requests in this process never read and write the pages
//! concurrently. Writers outside the process are caught by the store's revision
//! check.

use crate::api::SiteApi;
use crate::card::CardRenderer;
use crate::commands::CmdResult;
use crate::config::SiteConfig;
use crate::error::{Result, SiteError};
use crate::model::Submission;
use crate::store::fs::FileStore;
use crate::store::github::GitHubStore;
use crate::store::DocumentStore;
use axum::routing::{any, get, post};
use axum::{middleware, Router};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};

pub mod auth;
pub mod handlers;
pub mod pages;
pub mod response;
pub mod statics;
pub mod submission;

pub type DynStore = Box<dyn DocumentStore + Send + Sync>;
pub type SharedState = Arc<AppState>;

const PROXY_TIMEOUT: Duration = Duration::from_secs(30);

pub struct AppState {
    pub config: SiteConfig,
    pub site_root: PathBuf,
    local: SiteApi<DynStore>,
    remote: Option<SiteApi<DynStore>>,
    submissions: Mutex<()>,
    proxy: ureq::Agent,
}

impl AppState {
    pub fn new(
        site_root: PathBuf,
        config: SiteConfig,
        local: SiteApi<DynStore>,
        remote: Option<SiteApi<DynStore>>,
    ) -> Self {
        Self {
            config,
            site_root,
            local,
            remote,
            submissions: Mutex::new(()),
            proxy: ureq::AgentBuilder::new()
                .timeout(PROXY_TIMEOUT)
                .user_agent("szpineta-pl/1.0")
                .build(),
        }
    }

    /// Wires the file store for the site root, the GitHub store when configured,
    /// and the card renderer when a usable font is configured.
    pub fn for_site(site_root: &Path, config: SiteConfig) -> Self {
        let files = FileStore::new(site_root.to_path_buf())
            .with_paths(&config.listing.path, &config.summary.path);
        let mut local = SiteApi::new(Box::new(files) as DynStore, config.clone());
        match load_renderer(site_root, &config) {
            Some(renderer) => local = local.with_renderer(renderer),
            None => warn!("no card font configured, /poem-image.png will answer 503"),
        }

        let remote = match config.github_target() {
            Ok(target) => {
                info!(repo = %format!("{}/{}", target.owner, target.repo), branch = %target.branch, "remote publishing enabled");
                Some(SiteApi::new(
                    Box::new(GitHubStore::new(target)) as DynStore,
                    config.clone(),
                ))
            }
            Err(e) => {
                info!(reason = %e, "remote publishing disabled");
                None
            }
        };

        Self::new(site_root.to_path_buf(), config, local, remote)
    }

    pub fn local(&self) -> &SiteApi<DynStore> {
        &self.local
    }

    pub fn remote(&self) -> Result<&SiteApi<DynStore>> {
        self.remote
            .as_ref()
            .ok_or_else(|| SiteError::Configuration("GitHub env not configured".to_string()))
    }

    fn serialized<T>(&self, work: impl FnOnce() -> Result<T>) -> Result<T> {
        let _guard = self
            .submissions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        work()
    }

    pub fn add_local(&self, submission: &Submission) -> Result<CmdResult> {
        self.serialized(|| self.local.add_poem(submission))
    }

    pub fn add_remote(&self, submission: &Submission) -> Result<CmdResult> {
        let remote = self.remote()?;
        self.serialized(|| remote.add_poem(submission))
    }
}

fn load_renderer(site_root: &Path, config: &SiteConfig) -> Option<CardRenderer> {
    let path = config.card_font_path(site_root)?;
    match CardRenderer::from_file(&path, config.card.clone()) {
        Ok(renderer) => Some(renderer),
        Err(e) => {
            warn!(font = %path.display(), error = %e, "card font unusable");
            None
        }
    }
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/admin", get(handlers::admin_form))
        .route("/admin/add-poem", post(handlers::admin_add))
        .route("/api/add-poem", any(handlers::api_add))
        .route("/api/lawendamodel", get(handlers::asset_proxy))
        .route("/poems.html", get(handlers::share_page))
        .route("/poem-image.png", get(handlers::poem_card))
        .fallback(statics::serve_file)
        .layer(middleware::from_fn_with_state(
            SharedState::clone(&state),
            statics::guard_admin,
        ))
        .with_state(state)
}

pub async fn serve(state: SharedState, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, root = %state.site_root.display(), "serving site");
    if state.config.uses_default_password() {
        warn!("admin password is the default; set ADMIN_USER and ADMIN_PASS");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
