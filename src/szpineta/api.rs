//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for site
//! operations, whether they come from the HTTP server or the CLI.
//!
//! The facade dispatches to `commands/*.rs` and returns `Result<CmdResult>`. It does
//! no I/O of its own beyond what the store does, and no presentation: the HTTP
//! layer turns results into responses, the CLI prints their messages.
//!
//! ## Generic Over DocumentStore
//!
//! `SiteApi<S: DocumentStore>` runs unchanged against:
//! - the site directory: `SiteApi<FileStore>`
//! - a GitHub repository: `SiteApi<GitHubStore>`
//! - tests: `SiteApi<MemoryStore>`

use crate::card::CardRenderer;
use crate::commands;
use crate::config::SiteConfig;
use crate::error::Result;
use crate::model::Submission;
use crate::store::DocumentStore;

/// The main API facade for site operations.
pub struct SiteApi<S: DocumentStore> {
    store: S,
    config: SiteConfig,
    renderer: Option<CardRenderer>,
}

impl<S: DocumentStore> SiteApi<S> {
    pub fn new(store: S, config: SiteConfig) -> Self {
        Self {
            store,
            config,
            renderer: None,
        }
    }

    pub fn with_renderer(mut self, renderer: CardRenderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn add_poem(&self, submission: &Submission) -> Result<commands::CmdResult> {
        commands::add::run(&self.store, &self.config, submission)
    }

    pub fn show_poem(&self, number: u64) -> Result<commands::CmdResult> {
        commands::show::run(&self.store, number)
    }

    /// `poem` is the raw query value; anything that does not name a poem serves
    /// the listing unchanged.
    pub fn share_page(&self, poem: Option<&str>, base_url: &str) -> Result<commands::CmdResult> {
        commands::share::run(&self.store, poem, base_url)
    }

    pub fn poem_card(&self, number: u64) -> Result<commands::CmdResult> {
        commands::card::run(&self.store, self.renderer.as_ref(), number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SiteError;
    use crate::model::DocumentName;
    use crate::store::memory::MemoryStore;

    fn api() -> SiteApi<MemoryStore> {
        SiteApi::new(
            MemoryStore::with_documents(
                r#"<div id="poemsMount"></div>"#,
                r#"<div id="poemsSection"></div>"#,
            ),
            SiteConfig::default(),
        )
    }

    #[test]
    fn add_then_show() {
        let api = api();
        let added = api.add_poem(&Submission::new("t", "a\nb")).unwrap();
        assert_eq!(added.added.unwrap().listing_index, 0);

        let shown = api.show_poem(1).unwrap();
        assert_eq!(shown.poem.unwrap().lines, vec!["a", "b"]);
        assert_eq!(api.store().writes().len(), 2);
    }

    #[test]
    fn share_page_for_added_poem() {
        let api = api();
        api.add_poem(&Submission::new("", "wers")).unwrap();
        let result = api.share_page(Some("1"), "http://x").unwrap();
        assert_eq!(result.poem.unwrap().lines, vec!["wers"]);
        assert!(result.page.unwrap().contains("data-index=\"0\""));
    }

    #[test]
    fn card_without_renderer() {
        let api = api();
        api.add_poem(&Submission::new("", "wers")).unwrap();
        assert!(matches!(api.poem_card(1), Err(SiteError::Render(_))));
        assert!(api.store().content(DocumentName::Listing).is_some());
    }
}
