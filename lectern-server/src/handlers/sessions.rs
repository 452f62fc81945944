//! Reading sessions: a paginated reader per client

use super::error::{ApiError, ApiResult};
use crate::state::{AppState, Session};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use chrono::{DateTime, Utc};
use futures::stream::Stream;
use lectern_core::reader::{Bookmark, Direction, PageView, Position, TurnOutcome};
use lectern_core::{HolyText, Language, Toggle};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Text code, e.g. `quran`
    pub text: String,
    pub chapter: Option<u32>,
    pub verse: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct AutoplayState {
    pub enabled: bool,
    pub speed: u64,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub page: PageView,
    pub autoplay: AutoplayState,
}

impl SessionResponse {
    async fn from_session(session: &Session) -> Self {
        let autoplay = session.autoplay.lock().await;
        Self {
            id: session.id,
            created_at: session.created_at,
            page: session.reader.page(),
            autoplay: AutoplayState {
                enabled: autoplay.is_enabled(),
                speed: autoplay.speed(),
            },
        }
    }
}

/// Look up a session and mark it as in use
async fn find(state: &AppState, id: Uuid) -> ApiResult<Arc<Session>> {
    let session = state
        .session(id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("Unknown session: {}", id)))?;
    session.touch();
    Ok(session)
}

/// Open a reader on a text
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    let known = HolyText::well_known(&request.text).is_some()
        || state
            .catalog
            .fetch_texts()
            .await?
            .iter()
            .any(|t| t.code == request.text);
    if !known {
        return Err(ApiError::not_found(format!("Unknown text: {}", request.text)));
    }

    let start = Position::new(request.chapter.unwrap_or(1), request.verse.unwrap_or(1));
    let session = state.open_session(&request.text, start).await;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse::from_session(&session).await),
    ))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionResponse>> {
    let session = find(&state, id).await?;
    Ok(Json(SessionResponse::from_session(&session).await))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .close_session(id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("Unknown session: {}", id)))?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct TurnRequest {
    /// `forward`/`next` or `backward`/`prev`
    pub direction: String,
}

#[derive(Debug, Serialize)]
pub struct TurnResponse {
    pub outcome: TurnOutcome,
    pub page: PageView,
}

/// Turn one page
pub async fn turn_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<TurnRequest>,
) -> ApiResult<Json<TurnResponse>> {
    let direction: Direction = request.direction.parse().map_err(ApiError::bad_request)?;
    let session = find(&state, id).await?;

    let outcome = session.reader.turn_page(direction).await;
    Ok(Json(TurnResponse {
        outcome,
        page: session.reader.page(),
    }))
}

/// Jump to a chapter and verse; out-of-range values are clamped
pub async fn set_position(
    State(state): State<AppState>,
    Path((id, chapter, verse)): Path<(Uuid, u32, u32)>,
) -> ApiResult<Json<PageView>> {
    let session = find(&state, id).await?;
    session.reader.go_to(chapter, verse).await;
    Ok(Json(session.reader.page()))
}

#[derive(Debug, Serialize)]
pub struct BookmarkResponse {
    pub bookmarked: bool,
    pub bookmarks: Vec<Bookmark>,
}

/// Toggle a bookmark on the current verse
pub async fn toggle_bookmark(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BookmarkResponse>> {
    let session = find(&state, id).await?;
    let bookmarked = session.reader.toggle_bookmark().await;
    Ok(Json(BookmarkResponse {
        bookmarked,
        bookmarks: session.reader.bookmarks(),
    }))
}

pub async fn list_bookmarks(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Bookmark>>> {
    let session = find(&state, id).await?;
    Ok(Json(session.reader.reload_bookmarks().await))
}

#[derive(Debug, Serialize)]
pub struct LanguageResponse {
    pub toggle: Toggle,
    pub languages: Vec<Language>,
}

/// Toggle a display language; removing the last one is refused
pub async fn toggle_language(
    State(state): State<AppState>,
    Path((id, language)): Path<(Uuid, String)>,
) -> ApiResult<Json<LanguageResponse>> {
    let language: Language = language.parse().map_err(ApiError::bad_request)?;
    let session = find(&state, id).await?;

    match session.reader.toggle_language(language) {
        Toggle::Rejected => Err(ApiError::bad_request(
            "At least one language must remain selected",
        )),
        toggle => Ok(Json(LanguageResponse {
            toggle,
            languages: session.reader.languages().iter().collect(),
        })),
    }
}

#[derive(Debug, Deserialize)]
pub struct AutoplayRequest {
    pub enabled: bool,
    /// Seconds between turns, clamped to 1..=10
    pub speed: Option<u64>,
}

/// Start or stop timed page turning
pub async fn set_autoplay(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AutoplayRequest>,
) -> ApiResult<Json<AutoplayState>> {
    let session = find(&state, id).await?;
    let mut autoplay = session.autoplay.lock().await;

    if let Some(speed) = request.speed {
        autoplay.set_speed(speed);
    }
    autoplay.set_enabled(request.enabled);
    tracing::debug!(
        "Session {} autoplay {} every {}s",
        id,
        if request.enabled { "on" } else { "off" },
        autoplay.speed()
    );

    Ok(Json(AutoplayState {
        enabled: autoplay.is_enabled(),
        speed: autoplay.speed(),
    }))
}

/// SSE stream of the session's page after every position change
pub async fn session_events(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let session = find(&state, id).await?;
    let reader = session.reader.clone();
    let positions = WatchStream::new(reader.subscribe());

    let stream = positions.filter_map(move |_| {
        match Event::default().event("page").json_data(reader.page()) {
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                tracing::warn!("Failed to encode page event: {}", e);
                None
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
