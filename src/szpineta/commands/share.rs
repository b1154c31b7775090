use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, SiteError};
use crate::markup::find_entry;
use crate::markup::share::{apply_share_meta, ShareMeta};
use crate::model::DocumentName;
use crate::store::DocumentStore;
use tracing::debug;

use super::helpers::parse_poem_number;

/// The listing page, with its preview tags pointing at poem `poem` when that poem
/// exists. Any other `poem` value serves the page unchanged.
pub fn run<S: DocumentStore>(store: &S, poem: Option<&str>, base_url: &str) -> Result<CmdResult> {
    let listing = store.fetch(DocumentName::Listing).map_err(|e| match e {
        SiteError::DocumentUnavailable { .. } => SiteError::NotFound(e.to_string()),
        other => other,
    })?;

    let selected = parse_poem_number(poem)
        .ok()
        .and_then(|n| find_entry(&listing.content, n - 1).map(|p| (n, p)));

    let Some((number, text)) = selected else {
        if poem.is_some() {
            debug!(poem = ?poem, "no such poem, serving listing unchanged");
        }
        return Ok(CmdResult::default().with_page(listing.content));
    };

    let meta = ShareMeta::new(&text, number, base_url);
    let mut result = CmdResult::default()
        .with_page(apply_share_meta(&listing.content, &meta))
        .with_poem(text);
    result.add_message(CmdMessage::info(meta.title));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    const LISTING: &str = r#"<html><head>
<title>archiwum</title>
<meta property="og:title" content="szpineta">
</head><body>
<div id="poemsMount">
    <div class="poem" data-index="0">
        po pełni<br>
        cisza<br>
    </div>
</div>
</body></html>"#;

    #[test]
    fn rewrites_tags_for_existing_poem() {
        let store = MemoryStore::with_documents(LISTING, "");
        let result = run(&store, Some("1"), "https://szpineta.example").unwrap();
        let page = result.page.unwrap();
        assert!(page.contains(r#"<meta property="og:title" content="wiersz 1 — po pełni">"#));
        assert!(page.contains("<title>wiersz 1 — ~||-_^+*.</title>"));
        assert_eq!(result.poem.unwrap().lines, vec!["po pełni", "cisza"]);
    }

    #[test]
    fn unknown_or_invalid_poem_serves_page_unchanged() {
        let store = MemoryStore::with_documents(LISTING, "");
        for poem in [None, Some("2"), Some("zero"), Some("0")] {
            let result = run(&store, poem, "").unwrap();
            assert_eq!(result.page.as_deref(), Some(LISTING));
            assert!(result.poem.is_none());
        }
    }

    #[test]
    fn missing_listing_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            run(&store, Some("1"), ""),
            Err(SiteError::NotFound(_))
        ));
    }
}
