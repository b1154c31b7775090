//! Reading published poems back out of a page.

use super::format::normalize_newlines;
use super::locate::{inner_range, TagScanner};
use crate::model::PoemText;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").unwrap());

/// The poem stored as `<div class="poem" data-index="index">`.
pub fn find_entry(html: &str, index: u64) -> Option<PoemText> {
    let wanted = index.to_string();
    let open = TagScanner::new(html, "div").find(|tag| {
        tag.is_open()
            && tag.has_class("poem")
            && tag.attribute("data-index") == Some(wanted.as_str())
    })?;
    let range = inner_range(html, &open, "div")?;
    Some(PoemText::new(markup_to_lines(&html[range])))
}

/// Plain lines of an entry body.
///
/// Every source line and every `<br>` ends a poem line; a `<br>` closing a source
/// line does not add an extra one. Tags are stripped, entities decoded, lines
/// trimmed, and blank lines at either end dropped.
pub fn markup_to_lines(markup: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for segment in normalize_newlines(markup).split('\n') {
        let mut pieces: Vec<&str> = BREAK_RE.split(segment).collect();
        if pieces.len() > 1 && pieces.last().is_some_and(|p| p.trim().is_empty()) {
            pieces.pop();
        }
        for piece in pieces {
            let text = TAG_RE.replace_all(piece, "");
            lines.push(decode_entities(&text).trim().to_string());
        }
    }

    let first = lines.iter().position(|l| !l.is_empty());
    let last = lines.iter().rposition(|l| !l.is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].to_vec(),
        _ => Vec::new(),
    }
}

/// Decodes the handful of entities poems contain, in a single pass.
pub fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            let hex = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X"));
            let decoded = if let Some(hex) = hex {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse().ok().and_then(char::from_u32)
            } else {
                match name {
                    "nbsp" => Some(' '),
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    _ => None,
                }
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
