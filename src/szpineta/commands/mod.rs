use crate::model::{AddedPoem, PoemText};

pub mod add;
pub mod card;
pub mod helpers;
pub mod share;
pub mod show;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub added: Option<AddedPoem>,
    pub poem: Option<PoemText>,
    /// A rewritten page, ready to serve.
    pub page: Option<String>,
    /// Encoded PNG bytes.
    pub image: Option<Vec<u8>>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_added(mut self, added: AddedPoem) -> Self {
        self.added = Some(added);
        self
    }

    pub fn with_poem(mut self, poem: PoemText) -> Self {
        self.poem = Some(poem);
        self
    }

    pub fn with_page(mut self, page: String) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_image(mut self, image: Vec<u8>) -> Self {
        self.image = Some(image);
        self
    }

    /// Text of the first message, used as the one-line status of a request.
    pub fn summary(&self) -> &str {
        self.messages
            .first()
            .map(|m| m.content.as_str())
            .unwrap_or("")
    }
}
