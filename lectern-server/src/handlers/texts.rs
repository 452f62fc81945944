//! Catalog browsing and chapter downloads

use super::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use lectern_core::export::{download_file_name, export_title, exporter_for_format};
use lectern_core::reader::VerseView;
use lectern_core::{Chapter, HolyText, Language, LanguageSelection};
use serde::{Deserialize, Serialize};

/// List every text in the catalog
pub async fn list_texts(State(state): State<AppState>) -> ApiResult<Json<Vec<HolyText>>> {
    Ok(Json(state.catalog.fetch_texts().await?))
}

/// List the chapters of a text
pub async fn list_chapters(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<Vec<Chapter>>> {
    Ok(Json(state.catalog.fetch_chapter_list(&code).await?))
}

#[derive(Debug, Deserialize)]
pub struct VersesQuery {
    /// Comma-separated language tags, e.g. `original,english`
    pub languages: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VersesResponse {
    pub text_code: String,
    pub chapter: u32,
    pub languages: Vec<Language>,
    pub verses: Vec<VerseView>,
}

/// Verses of one chapter, filtered to the requested languages
///
/// Missing Malayalam and Tamil transliterations are generated when one of
/// them is requested.
pub async fn list_verses(
    State(state): State<AppState>,
    Path((code, chapter)): Path<(String, u32)>,
    Query(query): Query<VersesQuery>,
) -> ApiResult<Json<VersesResponse>> {
    let languages = match query.languages.as_deref() {
        Some(list) => LanguageSelection::parse_list(list).map_err(ApiError::bad_request)?,
        None => LanguageSelection::default(),
    };

    let mut verses = state.catalog.fetch_verses(&code, chapter).await?;
    if languages.contains(Language::MalayalamTransliteration)
        || languages.contains(Language::TamilTransliteration)
    {
        let written = state.transliterator.enrich_verses(&mut verses).await;
        tracing::debug!("Generated {} transliterations for {} {}", written, code, chapter);
    }

    Ok(Json(VersesResponse {
        text_code: code,
        chapter,
        languages: languages.iter().collect(),
        verses: verses
            .iter()
            .map(|v| VerseView::render(v, &languages))
            .collect(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    /// Output format (text, json)
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Download a chapter as a file
pub async fn download_chapter(
    State(state): State<AppState>,
    Path((code, chapter)): Path<(String, u32)>,
    Query(query): Query<DownloadQuery>,
) -> ApiResult<Response> {
    let exporter = exporter_for_format(&query.format)
        .ok_or_else(|| ApiError::bad_request(format!("Unsupported format: {}", query.format)))?;

    let verses = state.catalog.fetch_verses(&code, chapter).await?;
    let chapter_name = state
        .catalog
        .fetch_chapter(&code, chapter)
        .await?
        .map(|c| c.display_name())
        .unwrap_or_else(|| format!("Chapter {}", chapter));

    let title = export_title(&verses);
    let body = exporter.export_to_string(&title, &verses)?;
    let filename = download_file_name(&code, &chapter_name, exporter.file_extension());
    tracing::info!("Exporting {} verses of {} {} as {}", verses.len(), code, chapter, filename);

    Ok((
        [
            (header::CONTENT_TYPE, exporter.mime_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!(
                    "attachment; filename*=UTF-8''{}",
                    urlencoding::encode(&filename)
                ),
            ),
        ],
        body,
    )
        .into_response())
}
