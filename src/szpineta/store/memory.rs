use super::{DocumentStore, StoredDocument};
use crate::error::{Result, SiteError};
use crate::model::DocumentName;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Clone)]
struct MemDocument {
    content: String,
    revision: u64,
}

#[derive(Default)]
struct MemState {
    documents: HashMap<DocumentName, MemDocument>,
    fetches: usize,
    writes: Vec<(DocumentName, String)>,
    fail_writes: Vec<DocumentName>,
}

/// In-memory document store for testing.
///
/// Revisions are counters bumped on every write. Uses a `Mutex` so the store can
/// sit behind the HTTP layer's shared state.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(listing: &str, summary: &str) -> Self {
        let store = Self::new();
        store.insert(DocumentName::Listing, listing);
        store.insert(DocumentName::Summary, summary);
        store
    }

    fn state(&self) -> MutexGuard<'_, MemState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Sets content directly, as if edited by another writer. Bumps the revision.
    pub fn insert(&self, name: DocumentName, content: &str) {
        let mut state = self.state();
        let revision = state.documents.get(&name).map_or(1, |d| d.revision + 1);
        state.documents.insert(
            name,
            MemDocument {
                content: content.to_string(),
                revision,
            },
        );
    }

    pub fn content(&self, name: DocumentName) -> Option<String> {
        self.state().documents.get(&name).map(|d| d.content.clone())
    }

    pub fn fetch_count(&self) -> usize {
        self.state().fetches
    }

    /// Documents written so far, with their commit messages, in order.
    pub fn writes(&self) -> Vec<(DocumentName, String)> {
        self.state().writes.clone()
    }

    /// Makes every write to `name` fail with `PersistFailed`.
    pub fn fail_writes_to(&self, name: DocumentName) {
        self.state().fail_writes.push(name);
    }
}

impl DocumentStore for MemoryStore {
    fn fetch(&self, name: DocumentName) -> Result<StoredDocument> {
        let mut state = self.state();
        state.fetches += 1;
        let doc = state
            .documents
            .get(&name)
            .cloned()
            .ok_or_else(|| SiteError::DocumentUnavailable {
                document: name,
                reason: "not in memory store".to_string(),
            })?;
        Ok(StoredDocument {
            content: doc.content,
            revision: Some(doc.revision.to_string()),
        })
    }

    fn persist(
        &self,
        name: DocumentName,
        content: &str,
        expected_revision: Option<&str>,
        message: &str,
    ) -> Result<()> {
        let mut state = self.state();
        if state.fail_writes.contains(&name) {
            return Err(SiteError::PersistFailed {
                document: name,
                reason: "Simulated write error".to_string(),
            });
        }

        let current = state.documents.get(&name).map(|d| d.revision);
        if let Some(expected) = expected_revision {
            if current.map(|r| r.to_string()).as_deref() != Some(expected) {
                return Err(SiteError::Conflict {
                    document: name,
                    reason: format!("revision {expected} is stale"),
                });
            }
        }

        state.documents.insert(
            name,
            MemDocument {
                content: content.to_string(),
                revision: current.unwrap_or(0) + 1,
            },
        );
        state.writes.push((name, message.to_string()));
        Ok(())
    }

    fn location(&self, name: DocumentName) -> String {
        format!("memory://{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_bumps_revision() {
        let store = MemoryStore::with_documents("a", "b");
        let doc = store.fetch(DocumentName::Listing).unwrap();
        store
            .persist(DocumentName::Listing, "a2", doc.revision.as_deref(), "m")
            .unwrap();

        let again = store.fetch(DocumentName::Listing).unwrap();
        assert_eq!(again.content, "a2");
        assert_ne!(again.revision, doc.revision);
        assert_eq!(store.fetch_count(), 2);
    }

    #[test]
    fn stale_revision_conflicts() {
        let store = MemoryStore::with_documents("a", "b");
        let doc = store.fetch(DocumentName::Listing).unwrap();
        store.insert(DocumentName::Listing, "edited");

        let err = store
            .persist(DocumentName::Listing, "mine", doc.revision.as_deref(), "m")
            .unwrap_err();
        assert!(matches!(err, SiteError::Conflict { .. }));
        assert_eq!(store.content(DocumentName::Listing).unwrap(), "edited");
        assert!(store.writes().is_empty());
    }

    #[test]
    fn simulated_write_failure() {
        let store = MemoryStore::with_documents("a", "b");
        store.fail_writes_to(DocumentName::Summary);
        assert!(store
            .persist(DocumentName::Listing, "x", None, "m")
            .is_ok());
        assert!(matches!(
            store.persist(DocumentName::Summary, "x", None, "m"),
            Err(SiteError::PersistFailed { .. })
        ));
    }

    #[test]
    fn missing_document_is_unavailable() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.fetch(DocumentName::Listing),
            Err(SiteError::DocumentUnavailable { .. })
        ));
    }
}
