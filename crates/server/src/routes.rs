use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::blessing::store::BlessingStore;

pub mod blessings;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// CORS contract of the blessing API: any origin, GET/POST/OPTIONS,
/// Content-Type request header.
pub fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Build the full application router: blessing API, health, static assets
pub fn build_router(store: Arc<dyn BlessingStore>, cors: CorsLayer) -> Router {
    let static_dir = ServeDir::new("frontend").fallback(ServeFile::new("frontend/index.html"));

    // Public routes (static + health)
    let public = Router::new()
        .nest_service("/", static_dir)
        .route("/health", get(health));

    // The one API resource; unrecognized methods get an explicit 405
    let api = Router::new().route(
        "/api/blessings",
        get(blessings::list_blessings)
            .post(blessings::submit_blessing)
            .options(blessings::preflight)
            .fallback(blessings::method_not_allowed),
    );

    // Compose
    public
        .merge(api)
        .with_state(store)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                ),
        )
}
