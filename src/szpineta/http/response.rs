use crate::commands::CmdResult;
use crate::error::{ErrorKind, SiteError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::ConflictError => StatusCode::CONFLICT,
        ErrorKind::RenderError => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::ConfigurationError
        | ErrorKind::DocumentUnavailable
        | ErrorKind::ContainerNotFound
        | ErrorKind::PersistFailed
        | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    kind: ErrorKind,
    details: String,
}

/// A [`SiteError`] rendered as `{ "error", "kind", "details" }`.
#[derive(Debug)]
pub struct ApiError(pub SiteError);

impl From<SiteError> for ApiError {
    fn from(err: SiteError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = status_for(kind);
        if status.is_server_error() {
            error!(kind = ?kind, error = %self.0, "request failed");
        }
        let body = ErrorBody {
            error: status.canonical_reason().unwrap_or("Error"),
            kind,
            details: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Plain-text error for page and image routes.
pub fn text_error(err: SiteError) -> Response {
    let status = status_for(err.kind());
    if status.is_server_error() {
        error!(error = %err, "request failed");
    }
    (status, err.to_string()).into_response()
}

/// Body of a successful publishing API call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddResponse {
    pub ok: bool,
    pub message: String,
    pub data_index_poems: u64,
    pub data_index_index: u64,
    /// Set when only the listing was written.
    pub partial: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_error: Option<String>,
}

impl AddResponse {
    pub fn from_result(result: &CmdResult) -> Option<Self> {
        let added = result.added.as_ref()?;
        let summary_error = match &added.summary_status {
            crate::model::WriteStatus::Written => None,
            crate::model::WriteStatus::Failed(reason) => Some(reason.clone()),
        };
        Some(Self {
            ok: true,
            message: result.summary().to_string(),
            data_index_poems: added.listing_index,
            data_index_index: added.summary_index,
            partial: summary_error.is_some(),
            summary_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AddedPoem, DocumentName, WriteStatus};

    #[test]
    fn maps_kinds_to_statuses() {
        assert_eq!(status_for(ErrorKind::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(SiteError::EmptyBody.kind()), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(ErrorKind::ContainerNotFound),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(ErrorKind::ConfigurationError),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(status_for(ErrorKind::RenderError), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn add_response_uses_site_field_names() {
        let result = CmdResult::default().with_added(AddedPoem {
            listing_index: 5,
            summary_index: 5,
            title: None,
            summary_status: WriteStatus::Failed(format!("{} failed", DocumentName::Summary)),
        });
        let json = serde_json::to_value(AddResponse::from_result(&result).unwrap()).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["dataIndexPoems"], 5);
        assert_eq!(json["dataIndexIndex"], 5);
        assert_eq!(json["partial"], true);
        assert_eq!(json["summaryError"], "summary failed");
    }
}
