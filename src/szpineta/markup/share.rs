//! Social preview tags for linking to a single poem.

use super::format::{escape_attribute, escape_html};
use crate::model::PoemText;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

/// Signature shown on shared pages and story cards.
pub const SIGNATURE: &str = "~||-_^+*.";

static OG_TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<meta\s+property=["']og:title["'][^>]*>"#).unwrap());
static OG_DESCRIPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<meta\s+property=["']og:description["'][^>]*>"#).unwrap());
static OG_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<meta\s+property=["']og:url["'][^>]*>"#).unwrap());
static OG_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<meta\s+property=["']og:image["'][^>]*>"#).unwrap());
static TWITTER_TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<meta\s+name=["']twitter:title["'][^>]*>"#).unwrap());
static TWITTER_DESCRIPTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<meta\s+name=["']twitter:description["'][^>]*>"#).unwrap());
static TWITTER_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<meta\s+name=["']twitter:image["'][^>]*>"#).unwrap());
static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<title>[^<]*</title>").unwrap());

/// Preview values for poem number `number` (1-based, as shown to readers).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareMeta {
    pub number: u64,
    pub title: String,
    pub description: String,
    pub url: String,
    pub image: String,
}

impl ShareMeta {
    pub fn new(poem: &PoemText, number: u64, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        let first: String = poem.first_line().chars().take(50).collect();
        Self {
            number,
            title: format!("wiersz {number} — {first}"),
            description: poem.preview(),
            url: format!("{base}/poems.html#wiersz-{number}"),
            image: format!("{base}/poem-image.png?poem={number}"),
        }
    }
}

/// Replaces the first occurrence of each preview tag and the page title.
/// Tags missing from the page are left missing.
pub fn apply_share_meta(html: &str, meta: &ShareMeta) -> String {
    let title = escape_attribute(&meta.title);
    let description = escape_attribute(&meta.description);
    let url = escape_attribute(&meta.url);
    let image = escape_attribute(&meta.image);

    let replacements: [(&Lazy<Regex>, String); 8] = [
        (
            &OG_TITLE_RE,
            format!(r#"<meta property="og:title" content="{title}">"#),
        ),
        (
            &OG_DESCRIPTION_RE,
            format!(r#"<meta property="og:description" content="{description}">"#),
        ),
        (
            &OG_URL_RE,
            format!(r#"<meta property="og:url" content="{url}">"#),
        ),
        (
            &TWITTER_TITLE_RE,
            format!(r#"<meta name="twitter:title" content="{title}">"#),
        ),
        (
            &TWITTER_DESCRIPTION_RE,
            format!(r#"<meta name="twitter:description" content="{description}">"#),
        ),
        (
            &OG_IMAGE_RE,
            format!(r#"<meta property="og:image" content="{image}">"#),
        ),
        (
            &TWITTER_IMAGE_RE,
            format!(r#"<meta name="twitter:image" content="{image}">"#),
        ),
        (
            &TITLE_RE,
            format!(
                "<title>wiersz {} — {}</title>",
                meta.number,
                escape_html(SIGNATURE)
            ),
        ),
    ];

    let mut page = html.to_string();
    for (re, tag) in replacements.iter() {
        page = re.replace(&page, NoExpand(tag)).into_owned();
    }
    page
}
