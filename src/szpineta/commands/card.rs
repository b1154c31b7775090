use crate::card::CardRenderer;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, SiteError};
use crate::store::DocumentStore;
use tracing::info;

use super::helpers::load_poem;

/// Renders poem `number` as a PNG story card.
///
/// The poem is looked up before the renderer is checked, so a missing poem is
/// reported as such even when no font is configured.
pub fn run<S: DocumentStore>(
    store: &S,
    renderer: Option<&CardRenderer>,
    number: u64,
) -> Result<CmdResult> {
    let (_, poem) = load_poem(store, number)?;
    let renderer = renderer.ok_or_else(|| {
        SiteError::Render("No card font configured (set CARD_FONT or card_font)".to_string())
    })?;

    let png = renderer.render_png(&poem.lines)?;
    info!(poem = number, bytes = png.len(), "rendered card");

    let mut result = CmdResult::default().with_image(png).with_poem(poem);
    result.add_message(CmdMessage::success(format!("Rendered card for poem {number}")));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    const LISTING: &str = r#"<div id="poemsMount"><div class="poem" data-index="0">a<br></div></div>"#;

    #[test]
    fn missing_font_is_a_render_error() {
        let store = MemoryStore::with_documents(LISTING, "");
        assert!(matches!(run(&store, None, 1), Err(SiteError::Render(_))));
    }

    #[test]
    fn missing_poem_wins_over_missing_font() {
        let store = MemoryStore::with_documents(LISTING, "");
        assert!(matches!(run(&store, None, 5), Err(SiteError::NotFound(_))));
    }
}
