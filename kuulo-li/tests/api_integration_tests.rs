//! End-to-end API tests
//!
//! Each test builds a file-backed application in a temp directory and
//! drives it through the router, covering batch upload, pairing
//! outcomes, listing, detail, and media serving.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::util::ServiceExt;

use helpers::{create_test_app, get_json, post_batch, Part};

const VALID_SRT: &str = "1\n00:00:01,000 --> 00:00:03,500\nHyvää huomenta\n\n2\n00:00:04,000 --> 00:00:06,000\nMitä kuuluu?\n";
const BROKEN_SRT: &str = "just some text\nwithout any cue structure\n";

fn media_file_count(root: &std::path::Path, language_id: i64) -> usize {
    let dir = root.join(format!("media/{}", language_id));
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    }
}

#[tokio::test]
async fn health_endpoint_reports_module_info() {
    let (app, _pool, _temp_dir) = create_test_app().await;

    let (status, body) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "kuulo-li");
    assert!(body["version"].is_string());
    assert!(body["uptime_seconds"].is_number());
}

#[tokio::test]
async fn batch_creates_lesson_and_serves_media() {
    let (app, _pool, temp_dir) = create_test_app().await;

    let parts = [
        Part::Text {
            name: "language_id",
            value: "1",
        },
        Part::Text {
            name: "tag",
            value: "beginner",
        },
        Part::File {
            name: "files",
            file_name: "Lesson 1.mp3",
            bytes: b"fake mp3 payload",
        },
        Part::File {
            name: "files",
            file_name: "lesson_1.srt",
            bytes: VALID_SRT.as_bytes(),
        },
    ];
    let (status, body) = post_batch(app.clone(), &parts).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created_count"], 1);
    assert_eq!(body["skipped_files"].as_array().unwrap().len(), 0);
    assert_eq!(body["message"], "Batch complete: 1 created, 0 skipped");
    assert_eq!(media_file_count(temp_dir.path(), 1), 1);

    let (status, list) = get_json(app.clone(), "/api/v1/lessons").await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap().clone();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["title"], "Lesson 1");
    assert_eq!(list[0]["language_id"], 1);
    assert_eq!(list[0]["tag"], "beginner");

    let guid = list[0]["guid"].as_str().unwrap();
    let (status, detail) = get_json(app.clone(), &format!("/api/v1/lessons/{}", guid)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["transcript"], "Hyvää huomenta Mitä kuuluu?");
    assert_eq!(detail["cues"].as_array().unwrap().len(), 2);
    assert_eq!(detail["cues"][0]["start_ms"], 1000);

    let media_path = list[0]["media_path"].as_str().unwrap();
    let request = Request::builder()
        .uri(format!("/{}", media_path))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"fake mp3 payload");
}

#[tokio::test]
async fn ambiguous_audio_names_skip_the_whole_group() {
    let (app, _pool, temp_dir) = create_test_app().await;

    let parts = [
        Part::Text {
            name: "language_id",
            value: "1",
        },
        Part::File {
            name: "files",
            file_name: "lesson 1.mp3",
            bytes: b"audio a",
        },
        Part::File {
            name: "files",
            file_name: "lesson_1.mp3",
            bytes: b"audio b",
        },
        Part::File {
            name: "files",
            file_name: "lesson1.srt",
            bytes: VALID_SRT.as_bytes(),
        },
    ];
    let (status, body) = post_batch(app, &parts).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created_count"], 0);
    assert_eq!(
        body["skipped_files"],
        serde_json::json!([
            "lesson 1.mp3 (ambiguous match: multiple audio files normalize to 'lesson1')",
            "lesson1.srt (ambiguous match: related audio group was ambiguous)",
            "lesson_1.mp3 (ambiguous match: multiple audio files normalize to 'lesson1')",
        ])
    );
    assert_eq!(media_file_count(temp_dir.path(), 1), 0);
}

#[tokio::test]
async fn missing_subtitle_is_reported() {
    let (app, _pool, _temp_dir) = create_test_app().await;

    let parts = [
        Part::Text {
            name: "language_id",
            value: "1",
        },
        Part::File {
            name: "files",
            file_name: "lesson1.mp3",
            bytes: b"audio",
        },
    ];
    let (status, body) = post_batch(app, &parts).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created_count"], 0);
    assert_eq!(
        body["skipped_files"],
        serde_json::json!(["lesson1.mp3 (missing matching subtitle file)"])
    );
}

#[tokio::test]
async fn unusable_transcript_skips_pair_and_cleans_media() {
    let (app, _pool, temp_dir) = create_test_app().await;

    let parts = [
        Part::Text {
            name: "language_id",
            value: "1",
        },
        Part::File {
            name: "files",
            file_name: "lesson1.mp3",
            bytes: b"audio",
        },
        Part::File {
            name: "files",
            file_name: "lesson1.srt",
            bytes: BROKEN_SRT.as_bytes(),
        },
    ];
    let (status, body) = post_batch(app.clone(), &parts).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created_count"], 0);
    assert_eq!(
        body["skipped_files"],
        serde_json::json!(["lesson1.mp3 / lesson1.srt (transcript parsing failed)"])
    );
    assert_eq!(media_file_count(temp_dir.path(), 1), 0);

    let (_, list) = get_json(app, "/api/v1/lessons").await;
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn unsupported_files_do_not_block_valid_pairs() {
    let (app, _pool, _temp_dir) = create_test_app().await;

    let parts = [
        Part::Text {
            name: "language_id",
            value: "3",
        },
        Part::File {
            name: "files",
            file_name: "lesson1.mp3",
            bytes: b"audio",
        },
        Part::File {
            name: "files",
            file_name: "lesson1.srt",
            bytes: VALID_SRT.as_bytes(),
        },
        Part::File {
            name: "files",
            file_name: "notes.pdf",
            bytes: b"not a lesson",
        },
    ];
    let (status, body) = post_batch(app, &parts).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created_count"], 1);
    assert_eq!(
        body["skipped_files"],
        serde_json::json!(["notes.pdf (unsupported file type)"])
    );
}

#[tokio::test]
async fn unknown_language_id_is_rejected() {
    let (app, _pool, _temp_dir) = create_test_app().await;

    let parts = [
        Part::Text {
            name: "language_id",
            value: "99",
        },
        Part::File {
            name: "files",
            file_name: "lesson1.mp3",
            bytes: b"audio",
        },
        Part::File {
            name: "files",
            file_name: "lesson1.srt",
            bytes: VALID_SRT.as_bytes(),
        },
    ];
    let (status, body) = post_batch(app, &parts).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert_eq!(body["error"]["message"], "Unknown language_id: 99");
}

#[tokio::test]
async fn batch_without_files_is_rejected() {
    let (app, _pool, _temp_dir) = create_test_app().await;

    let parts = [Part::Text {
        name: "language_id",
        value: "1",
    }];
    let (status, body) = post_batch(app, &parts).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "No files uploaded");
}

#[tokio::test]
async fn batch_without_language_id_is_rejected() {
    let (app, _pool, _temp_dir) = create_test_app().await;

    let parts = [Part::File {
        name: "files",
        file_name: "lesson1.mp3",
        bytes: b"audio",
    }];
    let (status, body) = post_batch(app, &parts).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Missing language_id field");
}

#[tokio::test]
async fn non_numeric_language_id_is_rejected() {
    let (app, _pool, _temp_dir) = create_test_app().await;

    let parts = [
        Part::Text {
            name: "language_id",
            value: "finnish",
        },
        Part::File {
            name: "files",
            file_name: "lesson1.mp3",
            bytes: b"audio",
        },
    ];
    let (status, body) = post_batch(app, &parts).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Invalid language_id: 'finnish'");
}

#[tokio::test]
async fn languages_endpoint_lists_seeded_catalog() {
    let (app, _pool, _temp_dir) = create_test_app().await;

    let (status, body) = get_json(app, "/api/v1/languages").await;

    assert_eq!(status, StatusCode::OK);
    let languages = body.as_array().unwrap();
    assert_eq!(languages.len(), 5);
    assert_eq!(languages[0]["id"], 1);
    assert_eq!(languages[0]["code"], "fi");
    assert_eq!(languages[0]["name"], "Finnish");
}

#[tokio::test]
async fn lesson_listing_filters_by_language() {
    let (app, _pool, _temp_dir) = create_test_app().await;

    let finnish = [
        Part::Text {
            name: "language_id",
            value: "1",
        },
        Part::File {
            name: "files",
            file_name: "aamu.mp3",
            bytes: b"audio",
        },
        Part::File {
            name: "files",
            file_name: "aamu.srt",
            bytes: VALID_SRT.as_bytes(),
        },
    ];
    let (status, _) = post_batch(app.clone(), &finnish).await;
    assert_eq!(status, StatusCode::OK);

    let german = [
        Part::Text {
            name: "language_id",
            value: "2",
        },
        Part::File {
            name: "files",
            file_name: "morgen.mp3",
            bytes: b"audio",
        },
        Part::File {
            name: "files",
            file_name: "morgen.srt",
            bytes: VALID_SRT.as_bytes(),
        },
    ];
    let (status, _) = post_batch(app.clone(), &german).await;
    assert_eq!(status, StatusCode::OK);

    let (_, all) = get_json(app.clone(), "/api/v1/lessons").await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, filtered) = get_json(app.clone(), "/api/v1/lessons?language_id=2").await;
    let filtered = filtered.as_array().unwrap().clone();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["title"], "morgen");

    let (_, empty) = get_json(app, "/api/v1/lessons?language_id=4").await;
    assert_eq!(empty.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn unknown_lesson_returns_not_found() {
    let (app, _pool, _temp_dir) = create_test_app().await;

    let (status, body) = get_json(
        app,
        "/api/v1/lessons/00000000-0000-0000-0000-000000000000",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}
