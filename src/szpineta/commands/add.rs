use crate::commands::{CmdMessage, CmdResult};
use crate::config::{DocumentConfig, SiteConfig};
use crate::error::{Result, SiteError};
use crate::markup::{entry_block, find_first_container_close, next_index, splice, title_comment};
use crate::model::{AddedPoem, DocumentName, Submission, WriteStatus};
use crate::store::{DocumentStore, StoredDocument};
use chrono::Utc;
use tracing::{debug, info, warn};

use super::helpers::commit_message;

/// A document with the new entry spliced in, not yet written.
struct PendingWrite {
    name: DocumentName,
    revision: Option<String>,
    content: String,
}

fn insertion_point(doc: &StoredDocument, name: DocumentName, layout: &DocumentConfig) -> Result<usize> {
    let ids = layout.containers.iter().map(String::as_str);
    let (at, container) = find_first_container_close(&doc.content, ids).ok_or_else(|| {
        SiteError::ContainerNotFound {
            document: name,
            containers: layout.container_list(),
        }
    })?;
    debug!(document = %name, container, offset = at, "located container");
    Ok(at)
}

fn prepare(
    name: DocumentName,
    doc: StoredDocument,
    at: usize,
    index: u64,
    submission: &Submission,
    layout: &DocumentConfig,
) -> PendingWrite {
    let indent = layout.indentation();
    let mut insert = String::new();
    if layout.title_comment {
        if let Some(title) = submission.trimmed_title() {
            insert.push_str(&title_comment(title, &indent));
        }
    }
    insert.push_str(&entry_block(index, &submission.body, &indent));

    PendingWrite {
        name,
        content: splice(&doc.content, at, &insert),
        revision: doc.revision,
    }
}

/// Appends a poem to the end of the poem container in both the listing and the
/// summary page.
///
/// Both pages get the same index: the larger of their own next indices. Nothing is
/// written unless both pages were read and both containers found. The listing is
/// written first; if the summary write then fails, the listing keeps the poem and
/// the result reports the summary as failed instead of returning an error.
pub fn run<S: DocumentStore>(store: &S, config: &SiteConfig, submission: &Submission) -> Result<CmdResult> {
    if submission.body.trim().is_empty() {
        return Err(SiteError::EmptyBody);
    }

    let listing = store.fetch(DocumentName::Listing)?;
    let summary = store.fetch(DocumentName::Summary)?;

    let listing_at = insertion_point(&listing, DocumentName::Listing, &config.listing)?;
    let summary_at = insertion_point(&summary, DocumentName::Summary, &config.summary)?;

    let index = next_index(&listing.content).max(next_index(&summary.content));

    let listing = prepare(DocumentName::Listing, listing, listing_at, index, submission, &config.listing);
    let summary = prepare(DocumentName::Summary, summary, summary_at, index, submission, &config.summary);

    let title = submission.trimmed_title();
    let message = commit_message(title, Utc::now());

    store.persist(
        listing.name,
        &listing.content,
        listing.revision.as_deref(),
        &message,
    )?;
    info!(document = %listing.name, index, "poem added");

    let summary_status = match store.persist(
        summary.name,
        &summary.content,
        summary.revision.as_deref(),
        &message,
    ) {
        Ok(()) => {
            info!(document = %summary.name, index, "poem added");
            WriteStatus::Written
        }
        Err(e) => {
            warn!(document = %summary.name, index, error = %e, "partial write: summary not updated");
            WriteStatus::Failed(e.to_string())
        }
    };

    let listing_location = store.location(DocumentName::Listing);
    let summary_location = store.location(DocumentName::Summary);
    let mut result = CmdResult::default();
    match &summary_status {
        WriteStatus::Written => result.add_message(CmdMessage::success(format!(
            "Poem {} added to {} and {}",
            index, listing_location, summary_location
        ))),
        WriteStatus::Failed(reason) => result.add_message(CmdMessage::warning(format!(
            "Poem {} added to {}, but {} was not updated: {}",
            index, listing_location, summary_location, reason
        ))),
    }

    Ok(result.with_added(AddedPoem {
        listing_index: index,
        summary_index: index,
        title: title.map(str::to_string),
        summary_status,
    }))
}
