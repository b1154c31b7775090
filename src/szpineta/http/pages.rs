use crate::commands::{CmdResult, MessageLevel};
use crate::error::SiteError;
use crate::markup::format::escape_html;

pub const ADMIN_FORM: &str = r#"<!DOCTYPE html>
<html lang="pl"><head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>panel — dodaj wiersz</title>
  <meta name="robots" content="noindex,nofollow" />
  <style>
    body { font-family: 'ABC Diatype Rounded', 'Inter', -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 24px; }
    label { display:block; margin: 12px 0 6px; font-weight: 600; }
    input[type=text], textarea { width: 100%; max-width: 820px; padding: 10px; font: inherit; }
    textarea { height: 320px; }
    button { margin-top: 16px; padding: 10px 14px; font: inherit; cursor: pointer; }
    .hint { color: #666; font-size: 12px; margin-top: 4px; }
    .ok { color: #0a7d2e; }
    .err { color: #b00020; }
  </style>
</head><body>
  <h1>Dodaj wiersz</h1>
  <form method="post" action="/admin/add-poem">
    <label for="poemTitle">Tytuł (opcjonalnie, nie wpływa na wygląd)</label>
    <input type="text" id="poemTitle" name="poemTitle" placeholder="np. po pełni">
    <div class="hint">Tytuł zapisywany jest jako komentarz w kodzie źródłowym.</div>

    <label for="poemText">Treść wiersza</label>
    <textarea id="poemText" name="poemText" placeholder="Wpisz wiersz. Nowe linie będą zapisane jako &lt;br&gt;."></textarea>
    <div class="hint">Zachowaj puste linie tam, gdzie chcesz przerwę akapitową.</div>

    <button type="submit">Dodaj jako nowy wiersz</button>
  </form>
  <p class="hint">Po dodaniu odśwież <a href="/poems.html" target="_blank" rel="noopener">poems.html</a>.</p>
</body></html>"#;

const PAGE_LINKS: &str = r#"<p><a href="/poems.html" target="_blank" rel="noopener">Otwórz poems.html</a></p><p><a href="/index.html" target="_blank" rel="noopener">Otwórz index.html</a></p>"#;

/// Status fragment shown after the admin form is submitted.
pub fn added_fragment(result: &CmdResult) -> String {
    let mut html = String::new();
    for message in &result.messages {
        let class = match message.level {
            MessageLevel::Info | MessageLevel::Success => "ok",
            MessageLevel::Warning => "err",
        };
        html.push_str(&format!(
            "<p class=\"{class}\">{}</p>",
            escape_html(&message.content)
        ));
    }
    html.push_str(PAGE_LINKS);
    html
}

pub fn error_fragment(err: &SiteError) -> String {
    format!("<p class=\"err\">{}</p>", escape_html(&err.to_string()))
}
