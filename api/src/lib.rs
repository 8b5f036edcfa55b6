pub mod core {
    pub mod app_state;
    pub mod config;
}

pub mod error_handler;

mod middleware_layer {
    pub mod cors;
    pub mod json_extractor;
}

mod routes {
    pub mod chat {
        pub mod chat_request;
        pub mod chat_route;
    }
    pub mod health {
        pub mod health_route;
    }
    pub mod session {
        pub mod session_context_route;
    }
}

use std::sync::Arc;

use axum::{
    Router,
    http::Uri,
    middleware,
    routing::{get, post},
};
use tokio::signal;
use tracing::{error, info};

use crate::{
    core::{app_state::AppState, config::AppConfig},
    error_handler::{AppError, AppResult},
    middleware_layer::{cors::cors, json_extractor::json_error_mapper},
    routes::{
        chat::chat_route::chat_route, health::health_route::health_route,
        session::session_context_route::session_context_route,
    },
};

/// Builds the HTTP router over shared state.
///
/// CORS is the outermost layer so preflights never reach routing and
/// mapped error bodies still carry the headers.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/chat", post(chat_route))
        .route("/api/session/{session_id}/context", get(session_context_route))
        .route("/health", get(health_route))
        .fallback(not_found)
        .layer(middleware::from_fn(json_error_mapper))
        .layer(middleware::from_fn_with_state(state.clone(), cors))
        .with_state(state)
}

/// Loads config from env, builds state, and serves until Ctrl+C.
pub async fn start() -> AppResult<()> {
    let cfg = AppConfig::from_env()?;
    let state = Arc::new(AppState::from_config(&cfg).await?);
    let app = router(state.clone());

    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(AppError::Bind)?;

    info!(
        %addr,
        interpreter = state.interpreter.kind(),
        store = state.store.kind(),
        "HappyFares assistant listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod test_support {
    use std::{sync::Arc, time::Duration};

    use ai_llm_service::health_service::HealthService;
    use axum::http::HeaderValue;
    use page_assistant::Interpreter;
    use session_store::ContextStore;

    use crate::core::app_state::AppState;

    pub fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(
            Interpreter::Deterministic,
            ContextStore::in_memory(Duration::from_secs(60)),
            HealthService::new(Some(1)).unwrap(),
            HeaderValue::from_static("*"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::{Client, Response, header};
    use serde_json::Value;

    /// Serves the full router on an ephemeral port and returns its base URL.
    async fn spawn_app() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(test_support::test_state());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    async fn json_body(res: Response) -> Value {
        serde_json::from_str(&res.text().await.unwrap()).unwrap()
    }

    #[tokio::test]
    async fn fallback_is_json_not_found() {
        use axum::response::IntoResponse;

        let res = not_found(Uri::from_static("/nope")).await.into_response();
        assert_eq!(res.status(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn preflight_is_answered_before_routing() {
        let base = spawn_app().await;
        let res = client()
            .request(reqwest::Method::OPTIONS, format!("{base}/api/chat"))
            .header(header::ORIGIN, "https://happyfares.in")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), reqwest::StatusCode::NO_CONTENT);
        let h = res.headers();
        assert_eq!(h[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://happyfares.in");
        assert_eq!(h[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(h[header::ACCESS_CONTROL_ALLOW_HEADERS], "content-type");
        assert_eq!(h[header::VARY], "Origin");
    }

    #[tokio::test]
    async fn malformed_json_is_a_json_bad_request_with_cors() {
        let base = spawn_app().await;
        let res = client()
            .post(format!("{base}/api/chat"))
            .header(header::ORIGIN, "https://happyfares.in")
            .header(header::CONTENT_TYPE, "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
        assert_eq!(
            res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://happyfares.in"
        );
        assert!(res.headers().contains_key("x-request-id"));
        let body = json_body(res).await;
        assert_eq!(body["error"], "BAD_REQUEST");
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    }

    #[tokio::test]
    async fn wrong_shape_is_unprocessable_with_hint() {
        let base = spawn_app().await;
        let res = client()
            .post(format!("{base}/api/chat"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(r#"{"session_id":"abc","question":"cheapest?","context":[1]}"#)
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(res).await;
        assert_eq!(body["error"], "UNPROCESSABLE_ENTITY");
        assert!(
            body["message"]
                .as_str()
                .is_some_and(|m| m.ends_with("(expected a JSON object here)"))
        );
    }

    #[tokio::test]
    async fn missing_content_type_is_a_json_error() {
        let base = spawn_app().await;
        let res = client()
            .post(format!("{base}/api/chat"))
            .body(r#"{"session_id":"abc","question":"cheapest?","context":[]}"#)
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), reqwest::StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(
            res.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("application/json")
        );
        let body = json_body(res).await;
        assert_eq!(body["error"], "UNSUPPORTED_MEDIA_TYPE");
    }

    #[tokio::test]
    async fn unknown_path_is_json_not_found() {
        let base = spawn_app().await;
        let res = client().get(format!("{base}/nope")).send().await.unwrap();

        assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
        let body = json_body(res).await;
        assert_eq!(body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn chat_then_read_back_session_context() {
        let base = spawn_app().await;
        let http = client();

        let res = http
            .post(format!("{base}/api/chat"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(
                r#"{"session_id":"abc","question":"Which is the cheapest Air India flight after 6 pm?",
                    "context":[{"airline":"Air India","departure_time":"7:00 PM","price":5000}]}"#,
            )
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::OK);
        let answer = json_body(res).await;
        assert_eq!(
            answer["excerpt"],
            r#"{"airline": "Air India", "departure_time": "7:00 PM", "price": 5000}"#
        );

        let res = http
            .get(format!("{base}/api/session/abc/context"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::OK);
        let stored = json_body(res).await;
        assert_eq!(stored[0]["airline"], "Air India");
        assert_eq!(stored[0]["price"], 5000);

        let res = http
            .get(format!("{base}/api/session/unknown/context"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);
        assert_eq!(json_body(res).await["error"], "NOT_FOUND");
    }
}
