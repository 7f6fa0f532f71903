pub mod error;
pub mod limit;
pub mod routes;
pub mod state;

use axum::routing::{delete, get, post};
use axum::Router;
use std::path::Path;
use tower_http::cors::{Any, CorsLayer};

pub use state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/prds",
            get(routes::prds::list_prds).post(routes::prds::create_prd),
        )
        .route("/api/prds/{id}", get(routes::prds::get_prd))
        .route("/api/prds/{id}", delete(routes::prds::delete_prd))
        .route("/api/ocr", post(routes::ocr::extract_text))
        .route("/api/health", get(routes::health::health))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            limit::rate_limit,
        ))
        .layer(cors)
        .with_state(state)
}

/// Start the PRD API server for a project root.
pub async fn serve(root: &Path, config: &ralph_core::config::Config, port: u16) -> anyhow::Result<()> {
    let state = AppState::from_config(root, config)?;
    let app = build_router(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let actual_port = listener.local_addr()?.port();

    tracing::info!("ralph API server listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}
