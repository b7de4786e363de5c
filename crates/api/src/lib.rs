pub mod error;
pub mod routes;
pub mod state;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Diarization routes (100 MB body limit for audio uploads)
    let diarize_routes = Router::new()
        .route("/diarize", post(routes::diarize::upload))
        .route("/diarize/path", post(routes::diarize::from_path))
        .route("/diarize/speakers", post(routes::diarize::speaker_count))
        .layer(DefaultBodyLimit::max(100 * 1024 * 1024));

    // Health check
    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", diarize_routes)
        .merge(health)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
