//! Bible JSON uploads and per-text downloads

use super::error::{ApiError, ApiResult};
use crate::state::{AppState, ServerEvent};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use lectern_core::import::{
    import_bible_json, ImportSummary, Progress, RemoteImporter, SUPPORTED_DOWNLOADS,
};
use serde::Serialize;

/// Upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub code: String,
    pub summary: ImportSummary,
    pub message: String,
}

fn log_progress(progress: Progress) {
    tracing::debug!("Stored {}/{} chapters", progress.completed, progress.total);
}

/// Import a Bible JSON file sent as the multipart `file` field
pub async fn upload_bible(
    State(state): State<AppState>,
    mut multipart: axum_extra::extract::Multipart,
) -> ApiResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?;
        let json = String::from_utf8(data.to_vec())
            .map_err(|_| ApiError::bad_request("Uploaded file is not UTF-8 text"))?;

        let summary = match import_bible_json(
            state.writer.as_ref(),
            &json,
            Some(state.transliterator.as_ref()),
            &log_progress,
        )
        .await
        {
            Ok(summary) => summary,
            Err(e) => {
                state.broadcast(ServerEvent::ImportFailed {
                    code: "bible".to_string(),
                    message: e.to_string(),
                });
                return Err(e.into());
            }
        };

        let message = format!(
            "Imported {} chapters and {} verses",
            summary.chapters, summary.verses
        );
        state.broadcast(ServerEvent::TextImported {
            code: "bible".to_string(),
            message: message.clone(),
        });

        return Ok(Json(UploadResponse {
            code: "bible".to_string(),
            summary,
            message,
        }));
    }

    Err(ApiError::bad_request("No file provided"))
}

#[derive(Debug, Serialize)]
pub struct DownloadStarted {
    pub code: String,
    pub message: String,
}

/// Start downloading a text into the catalog
///
/// The download runs in the background; its outcome is published on the
/// event stream.
pub async fn download_text(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<(StatusCode, Json<DownloadStarted>)> {
    if !SUPPORTED_DOWNLOADS.contains(&code.as_str()) {
        return Err(ApiError::not_found(format!(
            "No download method available for book: {}",
            code
        )));
    }

    let importer = RemoteImporter::new(state.writer.clone(), &state.config);
    let task_state = state.clone();
    let task_code = code.clone();
    tokio::spawn(async move {
        let outcome = importer.download_and_store(&task_code, &log_progress).await;
        let event = if outcome.success {
            ServerEvent::TextImported {
                code: task_code,
                message: outcome.message,
            }
        } else {
            ServerEvent::ImportFailed {
                code: task_code,
                message: outcome.message,
            }
        };
        task_state.broadcast(event);
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(DownloadStarted {
            message: format!("Download of {} started", code),
            code,
        }),
    ))
}
