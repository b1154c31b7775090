use crate::error::{Result, SiteError};
use crate::markup::find_entry;
use crate::model::{DocumentName, PoemText};
use crate::store::DocumentStore;
use chrono::{DateTime, SecondsFormat, Utc};

/// Parses a reader-facing poem number (1-based).
pub fn parse_poem_number(raw: Option<&str>) -> Result<u64> {
    let raw = raw
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| SiteError::InvalidRequest("Missing poem parameter".to_string()))?;
    match raw.parse::<u64>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(SiteError::InvalidRequest(format!("Invalid poem number: {raw}"))),
    }
}

/// The poem shown as number `number` on the listing page, i.e. `data-index = number - 1`.
pub fn load_poem<S: DocumentStore>(store: &S, number: u64) -> Result<(String, PoemText)> {
    let index = number
        .checked_sub(1)
        .ok_or_else(|| SiteError::InvalidRequest("Poem numbers start at 1".to_string()))?;
    let listing = store.fetch(DocumentName::Listing).map_err(|e| match e {
        SiteError::DocumentUnavailable { .. } => SiteError::NotFound(e.to_string()),
        other => other,
    })?;
    let poem = find_entry(&listing.content, index)
        .ok_or_else(|| SiteError::NotFound(format!("Poem {number} not found")))?;
    Ok((listing.content, poem))
}

pub fn commit_message(title: Option<&str>, at: DateTime<Utc>) -> String {
    let timestamp = at.to_rfc3339_opts(SecondsFormat::Millis, true);
    match title {
        Some(title) => format!("Add poem: {title} ({timestamp})"),
        None => format!("Add poem ({timestamp})"),
    }
}
