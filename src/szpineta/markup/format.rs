//! Turning submitted text into entry markup.

/// Line break marker appended to every non-empty line.
pub const BREAK: &str = "<br>";

/// Leading whitespace for the generated `div` and for the poem lines inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indentation {
    pub block: String,
    pub text: String,
}

impl Indentation {
    pub fn spaces(block: usize, text: usize) -> Self {
        Self {
            block: " ".repeat(block),
            text: " ".repeat(text),
        }
    }
}

/// Escapes `&`, `<` and `>`. The ampersand goes first so produced entities are
/// not escaped twice.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// [`escape_html`] plus double quotes, for attribute values.
pub fn escape_attribute(input: &str) -> String {
    escape_html(input).replace('"', "&quot;")
}

pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Escaped poem lines, each non-empty one ending in `<br>`, joined by a newline and
/// `indent`. Empty lines stay empty so paragraph breaks render as gaps. Trailing
/// empty lines are dropped.
pub fn to_html_lines(text: &str, indent: &str) -> String {
    let escaped = escape_html(&normalize_newlines(text));
    let mut lines: Vec<&str> = escaped.split('\n').collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    let separator = format!("\n{indent}");
    lines
        .iter()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{line}{BREAK}")
            }
        })
        .collect::<Vec<_>>()
        .join(&separator)
}

/// `<div class="poem" data-index="N">` block, surrounded by newlines so it can be
/// dropped right before a closing tag.
pub fn entry_block(index: u64, text: &str, indent: &Indentation) -> String {
    format!(
        "\n{block}<div class=\"poem\" data-index=\"{index}\">\n{text_indent}{lines}\n{block}</div>\n",
        block = indent.block,
        text_indent = indent.text,
        lines = to_html_lines(text, &indent.text),
    )
}

/// Comment carrying the poem title; titles are never rendered.
pub fn title_comment(title: &str, indent: &Indentation) -> String {
    format!("\n{}<!-- {} -->", indent.block, escape_html(title))
}

/// `html` with `insert` placed at byte offset `at`.
pub fn splice(html: &str, at: usize, insert: &str) -> String {
    let mut out = String::with_capacity(html.len() + insert.len());
    out.push_str(&html[..at]);
    out.push_str(insert);
    out.push_str(&html[at..]);
    out
}
