use crate::model::DocumentName;
use serde::Serialize;
use thiserror::Error;

/// Machine-readable classification of a [`SiteError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthorized,
    InvalidRequest,
    ConfigurationError,
    DocumentUnavailable,
    ContainerNotFound,
    ConflictError,
    PersistFailed,
    RenderError,
    NotFound,
    Internal,
}

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Poem body is empty")]
    EmptyBody,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Document {document} unavailable: {reason}")]
    DocumentUnavailable {
        document: DocumentName,
        reason: String,
    },

    #[error("Container {containers} not found in {document}")]
    ContainerNotFound {
        document: DocumentName,
        containers: String,
    },

    #[error("Conflict while writing {document}: {reason}")]
    Conflict {
        document: DocumentName,
        reason: String,
    },

    #[error("Failed to write {document}: {reason}")]
    PersistFailed {
        document: DocumentName,
        reason: String,
    },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SiteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SiteError::Unauthorized => ErrorKind::Unauthorized,
            SiteError::EmptyBody | SiteError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            SiteError::Configuration(_) => ErrorKind::ConfigurationError,
            SiteError::DocumentUnavailable { .. } => ErrorKind::DocumentUnavailable,
            SiteError::ContainerNotFound { .. } => ErrorKind::ContainerNotFound,
            SiteError::Conflict { .. } => ErrorKind::ConflictError,
            SiteError::PersistFailed { .. } => ErrorKind::PersistFailed,
            SiteError::Render(_) => ErrorKind::RenderError,
            SiteError::NotFound(_) => ErrorKind::NotFound,
            SiteError::Io(_) | SiteError::Serialization(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
