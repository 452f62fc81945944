//! Server-Sent Events for catalog changes

use crate::state::{AppState, ServerEvent};
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// SSE endpoint announcing finished and failed imports
pub async fn import_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.subscribe());

    let event_stream = stream.filter_map(|result| {
        match result {
            Ok(event) => {
                let (event_type, data) = match event {
                    ServerEvent::TextImported { code, message } => (
                        "text_imported",
                        serde_json::json!({ "code": code, "message": message }).to_string(),
                    ),
                    ServerEvent::ImportFailed { code, message } => (
                        "import_failed",
                        serde_json::json!({ "code": code, "message": message }).to_string(),
                    ),
                };

                Some(Ok(Event::default().event(event_type).data(data)))
            }
            Err(_) => None, // Lagged, skip
        }
    });

    Sse::new(event_stream).keep_alive(KeepAlive::default())
}
