//! Error types for Lectern Core

use thiserror::Error;

/// Result type alias using LecternError
pub type Result<T> = std::result::Result<T, LecternError>;

/// Top-level error type for all Lectern operations
#[derive(Debug, Error)]
pub enum LecternError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Transliteration error: {0}")]
    Transliteration(#[from] TransliterationError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while reading from or writing to a catalog backend
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Unknown text: {0}")]
    UnknownText(String),

    #[error("Read-only catalog: {0}")]
    ReadOnly(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            CatalogError::Status {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            CatalogError::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Decode(err.to_string())
    }
}

/// Errors that occur while importing or downloading texts
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid Bible data structure: {0}")]
    InvalidStructure(String),

    #[error("No download method available for book: {0}")]
    UnsupportedText(String),

    #[error("Missing API key for {0}")]
    MissingApiKey(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Errors that occur during export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from a single transliteration backend
#[derive(Debug, Error)]
pub enum TransliterationError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Text contains no {0} script")]
    NoScript(String),

    #[error("Transliteration service failed: {0}")]
    Service(String),
}

impl From<reqwest::Error> for TransliterationError {
    fn from(err: reqwest::Error) -> Self {
        TransliterationError::Service(err.to_string())
    }
}

/// Errors that occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}
