use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::debug;

use crate::error_handler::ErrorBody;

async fn take_body(res: Response) -> (axum::http::response::Parts, Bytes) {
    let (parts, body) = res.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    (parts, bytes)
}

fn is_json(parts: &axum::http::response::Parts) -> bool {
    parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

fn ensure_request_id(parts: &mut axum::http::response::Parts) -> String {
    if let Some(v) = parts
        .headers
        .get("X-Request-Id")
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.trim().is_empty())
    {
        return v.to_string();
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    let id = format!("req-{nanos}");
    if let Ok(v) = HeaderValue::from_str(&id) {
        parts.headers.insert("X-Request-Id", v);
    }
    id
}

/// Builds the error body for a plain-text extractor rejection.
pub fn rejection_body(status: StatusCode, original: &str) -> ErrorBody {
    let code = match status {
        StatusCode::BAD_REQUEST => "BAD_REQUEST",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
        _ => "UNPROCESSABLE_ENTITY",
    };

    let mut message = original.trim().to_string();
    if message.contains("expected a sequence") {
        message.push_str(" (expected an array, e.g. \"context\": [{...}])");
    } else if message.contains("expected a map") || message.contains("expected struct") {
        message.push_str(" (expected a JSON object here)");
    }

    ErrorBody {
        error: code.into(),
        message,
    }
}

/// Rewrites 400/415/422 rejections from extractors into the JSON error body.
///
/// Responses that are already JSON (handler errors) pass through untouched.
pub async fn json_error_mapper(req: Request<Body>, next: Next) -> Response {
    let res = next.run(req).await;
    let status = res.status();

    if !matches!(
        status,
        StatusCode::BAD_REQUEST
            | StatusCode::UNSUPPORTED_MEDIA_TYPE
            | StatusCode::UNPROCESSABLE_ENTITY
    ) {
        return res;
    }

    let (mut parts, bytes) = take_body(res).await;
    if is_json(&parts) {
        return Response::from_parts(parts, bytes.into());
    }

    let original = String::from_utf8_lossy(&bytes);
    let req_id = ensure_request_id(&mut parts);
    debug!(%req_id, %status, "mapping extractor rejection to JSON error");

    let body = match serde_json::to_vec(&rejection_body(status, &original)) {
        Ok(v) => v,
        Err(_) => bytes.to_vec(),
    };

    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    Response::from_parts(parts, body.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_codes_follow_status() {
        let b = rejection_body(StatusCode::BAD_REQUEST, "Failed to parse the request body as JSON");
        assert_eq!(b.error, "BAD_REQUEST");

        let b = rejection_body(
            StatusCode::UNPROCESSABLE_ENTITY,
            "  missing field `session_id` at line 1 column 20 ",
        );
        assert_eq!(b.error, "UNPROCESSABLE_ENTITY");
        assert_eq!(b.message, "missing field `session_id` at line 1 column 20");

        let b = rejection_body(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Expected request with `Content-Type: application/json`",
        );
        assert_eq!(b.error, "UNSUPPORTED_MEDIA_TYPE");
    }

    #[test]
    fn hints_for_shape_errors() {
        let b = rejection_body(
            StatusCode::UNPROCESSABLE_ENTITY,
            "context: invalid type: map, expected a sequence",
        );
        assert!(b.message.ends_with("(expected an array, e.g. \"context\": [{...}])"));
    }
}
