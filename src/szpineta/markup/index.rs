//! Sequence numbers stored in `data-index` attributes.

const ATTRIBUTE: &str = "data-index";

/// Every `data-index` value in document order.
///
/// Only a whole attribute matches: the name must be preceded by whitespace and
/// followed by `=` and a quoted run of digits, so `xdata-index` or
/// `data-index-old` are skipped.
pub fn indices(html: &str) -> impl Iterator<Item = u64> + '_ {
    let bytes = html.as_bytes();
    html.match_indices(ATTRIBUTE).filter_map(move |(pos, _)| {
        let preceded = pos > 0 && bytes[pos - 1].is_ascii_whitespace();
        if !preceded {
            return None;
        }
        parse_value(&html[pos + ATTRIBUTE.len()..])
    })
}

fn parse_value(rest: &str) -> Option<u64> {
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let body = &rest[1..];
    let digits = body.find(|c: char| !c.is_ascii_digit()).unwrap_or(body.len());
    if digits == 0 || !body[digits..].starts_with(quote) {
        return None;
    }
    body[..digits].parse().ok()
}

/// The lowest index strictly greater than every existing one, or 0 for a document
/// without entries.
pub fn next_index(html: &str) -> u64 {
    indices(html).max().map_or(0, |max| max.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_after_sparse_indices() {
        let html = r#"
            <div class="poem" data-index="0"></div>
            <div class="poem" data-index="5"></div>
            <div class="poem" data-index="2"></div>"#;
        assert_eq!(next_index(html), 6);
    }

    #[test]
    fn zero_without_entries() {
        assert_eq!(next_index("<html><body><div id=\"poemsSection\"></div>"), 0);
    }

    #[test]
    fn tolerates_spacing_and_single_quotes() {
        let html = "<div class=\"poem\"\n  data-index = '7' title=\"x\">";
        assert_eq!(indices(html).collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn ignores_lookalike_attributes() {
        let html = concat!(
            "<div xdata-index=\"40\"></div>",
            "<div data-index-old=\"41\"></div>",
            "<p>data-index=\"42\" in text</p>",
            "<div data-index=\"4x\"></div>",
            "<div data-index=\"\"></div>",
            "<div data-index=\"3\"></div>"
        );
        assert_eq!(indices(html).collect::<Vec<_>>(), vec![3]);
        assert_eq!(next_index(html), 4);
    }

    #[test]
    fn mismatched_quotes_are_skipped() {
        assert_eq!(next_index("<div data-index=\"9'>"), 0);
    }

    #[test]
    fn oversized_values_are_skipped() {
        let html = "<div data-index=\"99999999999999999999999\"></div> <div data-index=\"1\">";
        assert_eq!(next_index(html), 2);
    }
}
