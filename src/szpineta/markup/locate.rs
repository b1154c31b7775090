//! Textual tag scanning for locating insertion points.
//!
//! This is deliberately not an HTML parser. Tags are recognised by their literal
//! `<name` / `</name` prefixes, so a `<div` or `</div>` appearing inside a comment,
//! a script or an attribute value is counted like a real tag and will shift the
//! located boundary. Elements are assumed to be well-formed and never self-closing.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Open,
    Close,
}

/// One start or end tag found in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'a> {
    pub kind: TagKind,
    /// Offset of the `<`.
    pub start: usize,
    /// Offset just past the `>`.
    pub end: usize,
    attrs: &'a str,
}

impl<'a> Tag<'a> {
    pub fn is_open(&self) -> bool {
        self.kind == TagKind::Open
    }

    pub fn attributes(&self) -> Attributes<'a> {
        Attributes { rest: self.attrs }
    }

    /// Value of the first attribute called `name` (ASCII case-insensitive).
    /// Valueless attributes yield an empty string.
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.attributes()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.unwrap_or(""))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .map(|v| v.split_ascii_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

/// Iterator over every start/end tag of one element type, in document order.
pub struct TagScanner<'a> {
    html: &'a str,
    name: &'a str,
    pos: usize,
}

impl<'a> TagScanner<'a> {
    pub fn new(html: &'a str, name: &'a str) -> Self {
        Self::starting_at(html, name, 0)
    }

    pub fn starting_at(html: &'a str, name: &'a str, pos: usize) -> Self {
        Self { html, name, pos }
    }
}

fn is_name_boundary(byte: Option<&u8>) -> bool {
    match byte {
        None => true,
        Some(b) => b.is_ascii_whitespace() || *b == b'>' || *b == b'/',
    }
}

impl<'a> Iterator for TagScanner<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Tag<'a>> {
        let bytes = self.html.as_bytes();
        loop {
            let start = self.pos + self.html.get(self.pos..)?.find('<')?;
            let (kind, name_start) = if bytes.get(start + 1) == Some(&b'/') {
                (TagKind::Close, start + 2)
            } else {
                (TagKind::Open, start + 1)
            };
            let name_end = name_start + self.name.len();

            let name_matches = bytes
                .get(name_start..name_end)
                .map(|b| b.eq_ignore_ascii_case(self.name.as_bytes()))
                .unwrap_or(false);
            if !name_matches || !is_name_boundary(bytes.get(name_end)) {
                self.pos = start + 1;
                continue;
            }

            // An unterminated tag ends the scan.
            let gt = self.html[name_end..].find('>')?;
            let end = name_end + gt + 1;
            let attrs = &self.html[name_end..end - 1];
            self.pos = end;

            if kind == TagKind::Close && !attrs.trim().is_empty() {
                continue;
            }
            return Some(Tag {
                kind,
                start,
                end,
                attrs,
            });
        }
    }
}

/// Iterator over `(name, value)` pairs inside a start tag.
pub struct Attributes<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Attributes<'a> {
    type Item = (&'a str, Option<&'a str>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let s = self
                .rest
                .trim_start_matches(|c: char| c.is_whitespace() || c == '/');
            if s.is_empty() {
                self.rest = s;
                return None;
            }

            let name_len = s
                .find(|c: char| c.is_whitespace() || c == '=' || c == '/')
                .unwrap_or(s.len());
            if name_len == 0 {
                // stray '='
                self.rest = &s[1..];
                continue;
            }
            let (name, after) = s.split_at(name_len);

            let Some(value) = after.trim_start().strip_prefix('=') else {
                self.rest = after;
                return Some((name, None));
            };
            let value = value.trim_start();
            let (parsed, rest) = match value.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &value[1..];
                    match body.find(quote) {
                        Some(close) => (&body[..close], &body[close + 1..]),
                        None => (body, ""),
                    }
                }
                _ => {
                    let len = value.find(char::is_whitespace).unwrap_or(value.len());
                    value.split_at(len)
                }
            };
            self.rest = rest;
            return Some((name, Some(parsed)));
        }
    }
}

/// First `<div>` start tag carrying `id="container_id"`.
pub fn find_container<'a>(html: &'a str, container_id: &str) -> Option<Tag<'a>> {
    TagScanner::new(html, "div").find(|tag| {
        tag.is_open()
            && tag
                .attribute("id")
                .map(|id| id.eq_ignore_ascii_case(container_id))
                .unwrap_or(false)
    })
}

/// Start offset of the end tag balancing `open`, counting nested same-name tags.
pub fn matching_close(html: &str, open: &Tag<'_>, name: &str) -> Option<usize> {
    let mut depth = 1usize;
    for tag in TagScanner::starting_at(html, name, open.end) {
        match tag.kind {
            TagKind::Open => depth += 1,
            TagKind::Close => {
                depth -= 1;
                if depth == 0 {
                    return Some(tag.start);
                }
            }
        }
    }
    None
}

/// Offset right before the closing `</div>` of the container `#container_id`.
///
/// `None` when the container is absent or the document ends before it is closed.
pub fn find_container_close(html: &str, container_id: &str) -> Option<usize> {
    let open = find_container(html, container_id)?;
    matching_close(html, &open, "div")
}

/// Tries each id in turn, returning the first one that resolves.
pub fn find_first_container_close<'i, I>(html: &str, container_ids: I) -> Option<(usize, &'i str)>
where
    I: IntoIterator<Item = &'i str>,
{
    container_ids
        .into_iter()
        .find_map(|id| find_container_close(html, id).map(|pos| (pos, id)))
}

/// Byte range of the content between `open` and its matching end tag.
pub fn inner_range(html: &str, open: &Tag<'_>, name: &str) -> Option<Range<usize>> {
    matching_close(html, open, name).map(|close| open.end..close)
}
