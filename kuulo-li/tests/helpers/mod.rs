//! Shared helpers for integration tests

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use kuulo_common::config::{database_path, ensure_root_folder};
use kuulo_common::db::init_database;
use kuulo_li::{build_router, AppState};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const BOUNDARY: &str = "kuulo-test-boundary";

/// Create a file-backed test application with its own root folder
///
/// Returns the router, the pool for direct assertions, and the temp
/// directory guard (dropping it deletes the root folder).
pub async fn create_test_app() -> (Router, SqlitePool, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let root_folder = temp_dir.path().to_path_buf();

    ensure_root_folder(&root_folder).expect("Failed to prepare root folder");
    let pool = init_database(&database_path(&root_folder))
        .await
        .expect("Failed to initialize database");

    let state = AppState::new(pool.clone(), root_folder);
    (build_router(state), pool, temp_dir)
}

/// One part of a multipart request body
pub enum Part<'a> {
    Text {
        name: &'a str,
        value: &'a str,
    },
    File {
        name: &'a str,
        file_name: &'a str,
        bytes: &'a [u8],
    },
}

/// Assemble a multipart/form-data body using [`BOUNDARY`]
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// POST a multipart batch and return status plus parsed JSON body
pub async fn post_batch(app: Router, parts: &[Part<'_>]) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/lessons/batch")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).expect("Response body should be JSON");
    (status, json)
}

/// GET a JSON endpoint and return status plus parsed body
pub async fn get_json(app: Router, path: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).expect("Response body should be JSON");
    (status, json)
}
