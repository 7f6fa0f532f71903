//! Per-route fixed-window rate limiting middleware.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

/// Resolve the client identity for rate-limiting purposes.
///
/// There is no auth layer, so identity is advisory: an explicit
/// `x-client-id`, else the first `x-forwarded-for` hop, else a shared
/// anonymous bucket.
pub fn client_identity(headers: &HeaderMap) -> String {
    if let Some(id) = headers.get("x-client-id").and_then(|v| v.to_str().ok()) {
        if !id.is_empty() {
            return id.to_string();
        }
    }
    if let Some(fwd) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = fwd.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    "anonymous".to_string()
}

/// Middleware over the whole router; only the expensive POST routes
/// (generation, OCR) are counted, reads pass through untouched.
pub async fn rate_limit(State(app): State<AppState>, req: Request, next: Next) -> Response {
    let (route, limit) = match (req.method(), req.uri().path()) {
        (&axum::http::Method::POST, "/api/prds") => ("generate", &app.limits.generate),
        (&axum::http::Method::POST, "/api/ocr") => ("ocr", &app.limits.ocr),
        _ => return next.run(req).await,
    };

    let client = client_identity(req.headers());
    let decision = app.limiter.check(&client, route, limit);

    if !decision.allowed {
        tracing::info!(client, route, "rate limit exceeded");
        let body = serde_json::json!({ "error": "rate limit exceeded" });
        let mut response =
            (StatusCode::TOO_MANY_REQUESTS, axum::Json(body)).into_response();
        if let Ok(value) = decision.retry_after_secs.to_string().parse() {
            response.headers_mut().insert("retry-after", value);
        }
        return response;
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_client_id_wins() {
        let mut headers = HeaderMap::new();
        headers.insert("x-client-id", "alice".parse().unwrap());
        headers.insert("x-forwarded-for", "10.0.0.1".parse().unwrap());
        assert_eq!(client_identity(&headers), "alice");
    }

    #[test]
    fn forwarded_for_uses_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            "203.0.113.9, 10.0.0.1".parse().unwrap(),
        );
        assert_eq!(client_identity(&headers), "203.0.113.9");
    }

    #[test]
    fn no_headers_means_anonymous() {
        assert_eq!(client_identity(&HeaderMap::new()), "anonymous");
    }
}
