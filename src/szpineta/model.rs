use serde::{Deserialize, Serialize};
use std::fmt;

/// The two pages every poem is published into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentName {
    /// The full archive page (`poems.html`).
    Listing,
    /// The landing page excerpt (`index.html`).
    Summary,
}

impl DocumentName {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentName::Listing => "listing",
            DocumentName::Summary => "summary",
        }
    }
}

impl fmt::Display for DocumentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A poem as submitted through the admin form, the API or the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Submission {
    #[serde(default, rename = "poemTitle")]
    pub title: String,
    #[serde(default, rename = "poemText")]
    pub body: String,
}

impl Submission {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// The title with surrounding whitespace removed, `None` when blank.
    pub fn trimmed_title(&self) -> Option<&str> {
        let title = self.title.trim();
        (!title.is_empty()).then_some(title)
    }
}

/// Outcome of writing one document during a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum WriteStatus {
    Written,
    Failed(String),
}

impl WriteStatus {
    pub fn is_written(&self) -> bool {
        matches!(self, WriteStatus::Written)
    }
}

/// Indices assigned to a newly published poem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddedPoem {
    pub listing_index: u64,
    pub summary_index: u64,
    pub title: Option<String>,
    pub summary_status: WriteStatus,
}

impl AddedPoem {
    pub fn is_complete(&self) -> bool {
        self.summary_status.is_written()
    }
}

/// Plain text of a published poem, recovered from its markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoemText {
    /// Every line of the poem, empty lines included.
    pub lines: Vec<String>,
}

impl PoemText {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    fn non_empty(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .map(|l| l.as_str())
            .filter(|l| !l.is_empty())
    }

    pub fn first_line(&self) -> &str {
        self.non_empty().next().unwrap_or("wiersz")
    }

    /// First three non-empty lines on one line, cut to 150 characters.
    pub fn preview(&self) -> String {
        let joined = self.non_empty().take(3).collect::<Vec<_>>().join(" ");
        let preview: String = joined.chars().take(150).collect();
        if preview.is_empty() {
            "staś szpineta archiwum".to_string()
        } else {
            preview
        }
    }
}
