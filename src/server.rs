//! HTTP surface
//!
//! Wires the upload forwarder into an axum router. The upload route is
//! registered for every method: the forwarder performs the method check
//! itself so the whole 405 contract (Allow header plus JSON message) lives
//! in one place.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{any, get};
use axum::Router;
use futures::{StreamExt, TryStreamExt};
use serde_json::json;

use crate::proxy::{BodyError, InboundUpload, Relay, UploadForwarder};

/// Shared state for the HTTP surface.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<UploadForwarder>,
}

/// Build the gateway router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/solve", any(solve))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Accept an image upload and relay it to the solver backend.
async fn solve(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let content_type = parts.headers.get(header::CONTENT_TYPE).cloned();
    let chunks = body
        .into_data_stream()
        .map_err(|e| Box::new(e) as BodyError)
        .boxed();

    let upload = InboundUpload::new(parts.method, content_type, chunks);
    state.forwarder.forward(upload).await.into_response()
}

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

impl IntoResponse for Relay {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();
        if let Some(allow) = self.allow {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static(allow));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::BackendClient;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use bytes::Bytes;
    use serde_json::Value;
    use url::Url;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_server(backend_url: Option<&str>) -> TestServer {
        let forwarder = UploadForwarder::new(
            backend_url.map(|u| Url::parse(u).unwrap()),
            BackendClient::new().unwrap(),
        );
        let state = AppState {
            forwarder: Arc::new(forwarder),
        };
        TestServer::new(router(state)).unwrap()
    }

    #[tokio::test]
    async fn test_healthz() {
        let server = test_server(None);
        let response = server.get("/healthz").await;
        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_solve_relays_backend_payload() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"solution": [5, 3]})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let server = test_server(Some(&mock_server.uri()));
        let response = server
            .post("/api/solve")
            .content_type("multipart/form-data; boundary=test")
            .bytes(Bytes::from_static(b"--test\r\nimage\r\n--test--"))
            .await;

        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["solution"], serde_json::json!([5, 3]));
    }

    #[tokio::test]
    async fn test_solve_rejects_non_post_with_allow_header() {
        let server = test_server(None);
        let response = server.get("/api/solve").await;

        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.headers().get(header::ALLOW).unwrap(),
            &HeaderValue::from_static("POST")
        );
        let body: Value = response.json();
        assert_eq!(body["message"], "Method GET Not Allowed");
    }

    #[tokio::test]
    async fn test_solve_backend_failure_passes_status_through() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_json(serde_json::json!({"message": "bad image"})),
            )
            .mount(&mock_server)
            .await;

        let server = test_server(Some(&mock_server.uri()));
        let response = server
            .post("/api/solve")
            .content_type("multipart/form-data; boundary=test")
            .bytes(Bytes::from_static(b"--test--"))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert_eq!(body["message"], "bad image");
        assert_eq!(body["details"]["message"], "bad image");
    }
}
