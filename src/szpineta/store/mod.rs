//! # Storage Layer
//!
//! Pages are read and written whole. The [`DocumentStore`] trait hides where they
//! live so the publishing logic runs unchanged against:
//!
//! - [`fs::FileStore`]: the site directory on local disk (admin form, CLI)
//! - [`github::GitHubStore`]: a GitHub repository through the contents API
//!   (remote publishing endpoint)
//! - [`memory::MemoryStore`]: in-memory documents for tests
//!
//! ## Revisions
//!
//! Every fetch returns an opaque revision alongside the content: a content hash on
//! disk, the blob sha on GitHub. Writing back with that revision is a
//! compare-and-swap; if the document changed in between the store refuses with
//! [`SiteError::Conflict`](crate::error::SiteError::Conflict) instead of
//! overwriting. Nothing is retried.

use crate::error::Result;
use crate::model::DocumentName;
use std::sync::Arc;

pub mod fs;
pub mod github;
pub mod memory;

/// A page as it was when fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub content: String,
    pub revision: Option<String>,
}

/// Whole-document storage for the site's pages.
pub trait DocumentStore {
    /// Current content and revision. Missing or unreadable documents are
    /// `DocumentUnavailable`.
    fn fetch(&self, name: DocumentName) -> Result<StoredDocument>;

    /// Replace the document. With `expected_revision`, fails with `Conflict` when
    /// the stored revision no longer matches; other failures are `PersistFailed`.
    /// `message` describes the change (used as the commit message by remote stores).
    fn persist(
        &self,
        name: DocumentName,
        content: &str,
        expected_revision: Option<&str>,
        message: &str,
    ) -> Result<()>;

    /// Human-readable location of a document (path or URL), for messages.
    fn location(&self, name: DocumentName) -> String;
}

impl<T: DocumentStore + ?Sized> DocumentStore for Box<T> {
    fn fetch(&self, name: DocumentName) -> Result<StoredDocument> {
        (**self).fetch(name)
    }

    fn persist(
        &self,
        name: DocumentName,
        content: &str,
        expected_revision: Option<&str>,
        message: &str,
    ) -> Result<()> {
        (**self).persist(name, content, expected_revision, message)
    }

    fn location(&self, name: DocumentName) -> String {
        (**self).location(name)
    }
}

impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    fn fetch(&self, name: DocumentName) -> Result<StoredDocument> {
        (**self).fetch(name)
    }

    fn persist(
        &self,
        name: DocumentName,
        content: &str,
        expected_revision: Option<&str>,
        message: &str,
    ) -> Result<()> {
        (**self).persist(name, content, expected_revision, message)
    }

    fn location(&self, name: DocumentName) -> String {
        (**self).location(name)
    }
}
