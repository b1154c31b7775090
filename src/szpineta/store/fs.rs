use super::{DocumentStore, StoredDocument};
use crate::error::{Result, SiteError};
use crate::model::DocumentName;
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Pages stored as files under the site root.
pub struct FileStore {
    root: PathBuf,
    listing: PathBuf,
    summary: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            listing: root.join("poems.html"),
            summary: root.join("index.html"),
            root,
        }
    }

    /// Overrides the document file names (relative to the root).
    pub fn with_paths(mut self, listing: &str, summary: &str) -> Self {
        self.listing = self.root.join(listing);
        self.summary = self.root.join(summary);
        self
    }

    pub fn path(&self, name: DocumentName) -> &Path {
        match name {
            DocumentName::Listing => &self.listing,
            DocumentName::Summary => &self.summary,
        }
    }
}

/// Content fingerprint used as the revision of files on disk.
pub fn fingerprint(content: &str) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("{:016x}-{}", hasher.finish(), content.len())
}

impl DocumentStore for FileStore {
    fn fetch(&self, name: DocumentName) -> Result<StoredDocument> {
        let path = self.path(name);
        let content = fs::read_to_string(path).map_err(|e| SiteError::DocumentUnavailable {
            document: name,
            reason: match e.kind() {
                IoErrorKind::NotFound => format!("{} not found", path.display()),
                _ => format!("{}: {}", path.display(), e),
            },
        })?;

        let revision = fingerprint(&content);
        debug!(document = %name, bytes = content.len(), %revision, "read document");
        Ok(StoredDocument {
            content,
            revision: Some(revision),
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

        if let Some(expected) = expected_revision {
            let current = fs::read_to_string(path).ok().map(|c| fingerprint(&c));
            if current.as_deref() != Some(expected) {
                return Err(SiteError::Conflict {
                    document: name,
                    reason: format!("{} changed since it was read", path.display()),
                });
            }
        }

        let failed = |e: std::io::Error| SiteError::PersistFailed {
            document: name,
            reason: format!("{}: {}", path.display(), e),
        };

        // Atomic write
        let dir = path.parent().unwrap_or(self.root.as_path());
        let tmp_path = dir.join(format!(".{}-{}.tmp", name, Uuid::new_v4()));
        fs::write(&tmp_path, content).map_err(failed)?;
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(failed(e));
        }

        debug!(document = %name, bytes = content.len(), change = message, "wrote document");
        Ok(())
    }

    fn location(&self, name: DocumentName) -> String {
        self.path(name).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_with(listing: &str) -> (tempfile::TempDir, FileStore) {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("poems.html"), listing).unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    #[test]
    fn fetch_returns_content_and_revision() {
        let (_dir, store) = store_with("<html></html>");
        let doc = store.fetch(DocumentName::Listing).unwrap();
        assert_eq!(doc.content, "<html></html>");
        assert_eq!(doc.revision, Some(fingerprint("<html></html>")));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let (_dir, store) = store_with("");
        let err = store.fetch(DocumentName::Summary).unwrap_err();
        assert!(matches!(
            err,
            SiteError::DocumentUnavailable {
                document: DocumentName::Summary,
                ..
            }
        ));
    }

    #[test]
    fn persist_with_matching_revision() {
        let (_dir, store) = store_with("old");
        let doc = store.fetch(DocumentName::Listing).unwrap();
        store
            .persist(DocumentName::Listing, "new", doc.revision.as_deref(), "m")
            .unwrap();
        assert_eq!(store.fetch(DocumentName::Listing).unwrap().content, "new");
    }

    #[test]
    fn stale_revision_is_a_conflict() {
        let (dir, store) = store_with("old");
        let doc = store.fetch(DocumentName::Listing).unwrap();
        fs::write(dir.path().join("poems.html"), "edited elsewhere").unwrap();

        let err = store
            .persist(DocumentName::Listing, "new", doc.revision.as_deref(), "m")
            .unwrap_err();
        assert!(matches!(err, SiteError::Conflict { .. }));
        assert_eq!(
            fs::read_to_string(dir.path().join("poems.html")).unwrap(),
            "edited elsewhere"
        );
    }

    #[test]
    fn persist_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nope"));
        let err = store
            .persist(DocumentName::Listing, "x", None, "m")
            .unwrap_err();
        assert!(matches!(err, SiteError::PersistFailed { .. }));
    }

    #[test]
    fn custom_paths() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).with_paths("a.html", "b.html");
        assert_eq!(store.path(DocumentName::Summary), dir.path().join("b.html"));
    }

    #[test]
    fn leaves_no_temp_files() {
        let (dir, store) = store_with("old");
        store
            .persist(DocumentName::Listing, "new", None, "m")
            .unwrap();
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["poems.html"]);
    }
}
