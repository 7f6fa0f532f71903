use axum::extract::State;
use axum::Json;
use base64::Engine as _;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct OcrBody {
    pub image_b64: String,
}

/// POST /api/ocr — extract text from a base64-encoded image.
///
/// The caller folds the returned text into the starter prompt of a
/// subsequent generation request.
pub async fn extract_text(
    State(app): State<AppState>,
    Json(body): Json<OcrBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let image = base64::engine::general_purpose::STANDARD
        .decode(body.image_b64.trim())
        .map_err(|e| AppError::bad_request(format!("image_b64 is not valid base64: {e}")))?;

    if image.is_empty() {
        return Err(AppError::bad_request("image_b64 decoded to zero bytes"));
    }

    let text = app.ocr.extract(&image).await?;
    Ok(Json(serde_json::json!({ "text": text })))
}
