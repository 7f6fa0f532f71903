use axum::extract::State;
use axum::Json;

use crate::state::AppState;

/// GET /api/health — provider identity and store reachability.
pub async fn health(State(app): State<AppState>) -> Json<serde_json::Value> {
    let store_ok = {
        let store = app.store.clone();
        tokio::task::spawn_blocking(move || store.list(1, 1).is_ok())
            .await
            .unwrap_or(false)
    };

    Json(serde_json::json!({
        "status": if store_ok { "ok" } else { "degraded" },
        "provider": app.assembler.provider().kind(),
        "model": app.assembler.provider().model(),
        "ocr_available": app.ocr.binary_available(),
    }))
}
