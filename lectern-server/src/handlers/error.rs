//! API error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lectern_core::{CatalogError, ExportError, ImportError};
use serde_json::json;

/// Error returned by handlers, rendered as `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("{}", self.message);
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        let status = match &err {
            CatalogError::UnknownText(_) => StatusCode::NOT_FOUND,
            CatalogError::ReadOnly(_) => StatusCode::METHOD_NOT_ALLOWED,
            CatalogError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CatalogError::Request(_) | CatalogError::Status { .. } | CatalogError::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
        };
        Self::new(status, err.to_string())
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Catalog(e) => e.into(),
            ImportError::UnsupportedText(_) => Self::not_found(err.to_string()),
            ImportError::MissingApiKey(_) => {
                Self::new(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
            }
            ImportError::InvalidJson(_) | ImportError::InvalidStructure(_) => {
                Self::bad_request(err.to_string())
            }
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::UnsupportedFormat(_) => Self::bad_request(err.to_string()),
            _ => Self::internal(err.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err: ApiError = CatalogError::UnknownText("x".into()).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err: ApiError = CatalogError::Status {
            status: 500,
            url: "https://db".into(),
        }
        .into();
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);

        let err: ApiError = ImportError::InvalidStructure("no books".into()).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
