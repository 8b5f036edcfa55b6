use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::core::app_state::AppState;

const ALLOW_METHODS: HeaderValue = HeaderValue::from_static("GET, POST, OPTIONS");

/// Answers preflights with 204 and stamps CORS headers on every response.
pub async fn cors(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    let request_origin = req.headers().get(header::ORIGIN).cloned();
    let request_headers = req
        .headers()
        .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
        .cloned();

    let mut res = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };

    apply_cors_headers(
        res.headers_mut(),
        &state.cors_origin,
        request_origin,
        request_headers,
    );
    res
}

/// With credentials allowed, a wildcard origin is answered by echoing the caller's origin.
pub fn apply_cors_headers(
    headers: &mut HeaderMap,
    allowed: &HeaderValue,
    request_origin: Option<HeaderValue>,
    request_headers: Option<HeaderValue>,
) {
    let origin = match request_origin {
        Some(o) if allowed == "*" => {
            headers.append(header::VARY, HeaderValue::from_static("Origin"));
            o
        }
        _ => allowed.clone(),
    };

    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        request_headers.unwrap_or_else(|| HeaderValue::from_static("*")),
    );
}
