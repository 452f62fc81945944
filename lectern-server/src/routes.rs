//! API routes

use crate::handlers;
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the CORS layer from a comma-separated origin list, or "*" for any
fn cors_layer(origins: Option<String>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origins {
        Some(origins) if origins.trim() == "*" => layer.allow_origin(Any),
        Some(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            layer.allow_origin(AllowOrigin::list(allowed))
        }
        // Default: allow localhost origins for development
        None => layer.allow_origin(AllowOrigin::list([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:5173"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
            HeaderValue::from_static("http://127.0.0.1:5173"),
        ])),
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(std::env::var("LECTERN_CORS_ORIGINS").ok());

    let api_routes = Router::new()
        .route("/health", get(handlers::health_check))
        // Catalog
        .route("/texts", get(handlers::list_texts))
        .route("/texts/:code/chapters", get(handlers::list_chapters))
        .route(
            "/texts/:code/chapters/:chapter/verses",
            get(handlers::list_verses),
        )
        .route(
            "/texts/:code/chapters/:chapter/download",
            get(handlers::download_chapter),
        )
        // Reading sessions
        .route("/sessions", post(handlers::create_session))
        .route(
            "/sessions/:id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/sessions/:id/turn", post(handlers::turn_page))
        .route(
            "/sessions/:id/position/:chapter/:verse",
            put(handlers::set_position),
        )
        .route("/sessions/:id/bookmark", post(handlers::toggle_bookmark))
        .route("/sessions/:id/bookmarks", get(handlers::list_bookmarks))
        .route(
            "/sessions/:id/languages/:language",
            post(handlers::toggle_language),
        )
        .route("/sessions/:id/autoplay", put(handlers::set_autoplay))
        .route("/sessions/:id/events", get(handlers::session_events))
        // Imports
        .route("/import/bible", post(handlers::upload_bible))
        .route("/download/:code", post(handlers::download_text))
        // SSE endpoint
        .route("/events", get(handlers::import_events));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

