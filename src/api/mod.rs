//! REST API module using Axum
//!
//! Provides HTTP endpoints for the trial engine:
//! - case intake and retrieval
//! - trial state machine operations (phases, turns, examinations, exhibits)
//! - objection suggestion, rulings, and statistics
//! - motion rulings (single and batch)
//! - jury instruction generation and publication
//! - deliberation rounds and verdicts
//!
//! All responses use a consistent envelope with a `meta` block.

pub mod envelope;
pub mod handlers;
mod routes;

pub use handlers::AppState;

use axum::http::{header, Method, Uri};
use axum::response::Response;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use envelope::ApiErrorResponse;

/// Build a CORS layer that is restrictive by default (same-origin only).
///
/// Set `GAVEL_CORS_ORIGINS` to a comma-separated list of allowed origins
/// for development (e.g., `http://localhost:5173` for a dev frontend).
fn build_cors_layer() -> CorsLayer {
    match std::env::var("GAVEL_CORS_ORIGINS") {
        Ok(origins) => {
            let allowed: Vec<_> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            tracing::info!(origins = %origins, "CORS: allowing configured origins");
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        }
        Err(_) => {
            // No cross-origin allowed by default
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        }
    }
}

async fn not_found(uri: Uri) -> Response {
    ApiErrorResponse::not_found(format!("no route for {}", uri.path()))
}

/// Create the complete application router.
pub fn create_app(state: AppState) -> Router {
    let cors = build_cors_layer();

    Router::new()
        .nest("/api/v1", routes::api_routes(state))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
