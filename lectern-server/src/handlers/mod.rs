//! Request handlers

mod error;
mod events;
mod import;
mod sessions;
mod texts;

pub use error::{ApiError, ApiResult};
pub use events::*;
pub use import::*;
pub use sessions::*;
pub use texts::*;

use axum::Json;
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
