use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use polymesh_shared::{MeshRequest, MeshResponse, MIN_POLYGON_POINTS};

use crate::csrf;
use crate::mesh::MeshJob;
use crate::state::{AppState, MESH_OK_MESSAGE};

fn failure(status: StatusCode, error: impl Into<String>) -> Response {
    (status, Json(MeshResponse::failure(error))).into_response()
}

/// Serves the editor page, handing out a CSRF cookie on first visit.
pub async fn index_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let contents = match tokio::fs::read_to_string(&state.index_file).await {
        Ok(contents) => contents,
        Err(error) => {
            log::error!(
                "Failed to read index file {}: {error}",
                state.index_file.display()
            );
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    let mut response = Html(contents).into_response();
    if csrf::cookie_token(&headers).is_none() {
        match csrf::set_cookie_value(&csrf::new_token()) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(error) => log::error!("Failed to build CSRF cookie: {error}"),
        }
    }
    response
}

pub async fn generate_mesh_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !csrf::verify(&headers) {
        log::warn!("Rejected mesh request: CSRF token missing or mismatched");
        return failure(StatusCode::FORBIDDEN, "CSRF verification failed.");
    }
    let request: MeshRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(error) => {
            log::warn!("Rejected mesh request: {error}");
            return failure(StatusCode::BAD_REQUEST, error.to_string());
        }
    };
    if request.points.len() < MIN_POLYGON_POINTS {
        return failure(
            StatusCode::BAD_REQUEST,
            "Invalid polygon. At least 3 points required.",
        );
    }

    let job = MeshJob::from_request(request);
    log::info!(
        "Mesh request points={} num_points={}",
        job.points.len(),
        job.num_points
    );
    match state.mesh.generate(&job).await {
        Ok(edges) => {
            log::info!("Mesh generated edges={}", edges.len());
            Json(MeshResponse::Success {
                edges,
                message: Some(MESH_OK_MESSAGE.to_string()),
            })
            .into_response()
        }
        Err(error) => {
            log::error!("Mesh generation failed: {error}");
            failure(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
        }
    }
}

pub async fn invalid_request_handler() -> Response {
    failure(StatusCode::BAD_REQUEST, "Invalid request")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::http::header::COOKIE;
    use axum::http::HeaderValue;
    use polymesh_shared::{decode_mesh_response, Edge, Point};

    use super::*;
    use crate::mesh::{MeshService, MeshServiceError};

    struct FakeMesh {
        reply: Result<Vec<Edge>, String>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MeshService for FakeMesh {
        async fn generate(&self, _job: &MeshJob) -> Result<Vec<Edge>, MeshServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().map_err(MeshServiceError::Rejected)
        }
    }

    fn app_state(reply: Result<Vec<Edge>, String>, index_file: PathBuf) -> (AppState, Arc<FakeMesh>) {
        let mesh = Arc::new(FakeMesh {
            reply,
            calls: AtomicUsize::new(0),
        });
        let state = AppState {
            mesh: mesh.clone(),
            index_file,
        };
        (state, mesh)
    }

    fn csrf_headers(token: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("csrftoken=tok"));
        headers.insert("x-csrftoken", HeaderValue::from_static(token));
        headers
    }

    async fn read_response(response: Response) -> (StatusCode, MeshResponse) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        (status, decode_mesh_response(&body).unwrap())
    }

    const SQUARE: &str = r#"{"points":[[10,10],[50,10],[50,50],[10,10]]}"#;

    #[tokio::test]
    async fn relays_generated_mesh() {
        let edges = vec![Edge(Point::new(10.0, 10.0), Point::new(50.0, 10.0))];
        let (state, mesh) = app_state(Ok(edges.clone()), PathBuf::new());
        let response =
            generate_mesh_handler(State(state), csrf_headers("tok"), Bytes::from(SQUARE)).await;
        let (status, body) = read_response(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            MeshResponse::Success {
                edges,
                message: Some(MESH_OK_MESSAGE.to_string()),
            }
        );
        assert_eq!(mesh.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn csrf_mismatch_is_forbidden() {
        let (state, mesh) = app_state(Ok(Vec::new()), PathBuf::new());
        let response =
            generate_mesh_handler(State(state), csrf_headers("other"), Bytes::from(SQUARE)).await;
        let (status, body) = read_response(response).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, MeshResponse::failure("CSRF verification failed."));
        assert_eq!(mesh.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn too_few_points_never_reach_the_service() {
        let (state, mesh) = app_state(Ok(Vec::new()), PathBuf::new());
        let body = Bytes::from(r#"{"points":[[0,0],[1,1]]}"#);
        let response = generate_mesh_handler(State(state), csrf_headers("tok"), body).await;
        let (status, body) = read_response(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            MeshResponse::failure("Invalid polygon. At least 3 points required.")
        );
        assert_eq!(mesh.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_points_fail_the_polygon_check() {
        let (state, mesh) = app_state(Ok(Vec::new()), PathBuf::new());
        let body = Bytes::from(r#"{"num_points":50}"#);
        let response = generate_mesh_handler(State(state), csrf_headers("tok"), body).await;
        let (status, body) = read_response(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            MeshResponse::failure("Invalid polygon. At least 3 points required.")
        );
        assert_eq!(mesh.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_body_is_a_bad_request() {
        let (state, _) = app_state(Ok(Vec::new()), PathBuf::new());
        let response =
            generate_mesh_handler(State(state), csrf_headers("tok"), Bytes::from("not json")).await;
        let (status, body) = read_response(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(matches!(body, MeshResponse::Failure { .. }));
    }

    #[tokio::test]
    async fn upstream_failure_is_reported() {
        let (state, _) = app_state(Err("bad polygon".into()), PathBuf::new());
        let response =
            generate_mesh_handler(State(state), csrf_headers("tok"), Bytes::from(SQUARE)).await;
        let (status, body) = read_response(response).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, MeshResponse::failure("bad polygon"));
    }

    #[tokio::test]
    async fn other_methods_are_invalid() {
        let (status, body) = read_response(invalid_request_handler().await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, MeshResponse::failure("Invalid request"));
    }

    #[tokio::test]
    async fn index_issues_csrf_cookie_once() {
        let dir = tempfile::tempdir().unwrap();
        let index_file = dir.path().join("index.html");
        std::fs::write(&index_file, "<canvas id=\"myCanvas\"></canvas>").unwrap();
        let (state, _) = app_state(Ok(Vec::new()), index_file);

        let response = index_handler(State(state.clone()), HeaderMap::new()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("csrftoken="));

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("csrftoken=existing"));
        let response = index_handler(State(state), headers).await;
        assert!(response.headers().get(SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn missing_index_is_a_server_error() {
        let (state, _) = app_state(Ok(Vec::new()), PathBuf::from("/nonexistent/index.html"));
        let response = index_handler(State(state), HeaderMap::new()).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
