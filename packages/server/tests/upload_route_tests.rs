//! Upload validation and ingestion through the HTTP layer.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
};
use doc_rag::{testing::MockGenerator, ParsedElement};

use crate::common::*;

#[tokio::test]
async fn pdf_upload_is_indexed_and_activated() {
    let harness = TestHarness::new(MockGenerator::new());

    let (status, body) = harness
        .upload("/api/v1/upload", "file", "handbook.pdf", FAKE_PDF)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "success");
    assert_eq!(body["data"]["filename"], "handbook.pdf");
    assert_eq!(body["data"]["message"], "PDF uploaded and indexed.");

    let document = harness.state.slot.current().await.expect("document active");
    assert_eq!(document.name(), Some("handbook.pdf"));
    assert_eq!(document.chunks().len(), 2);
}

#[tokio::test]
async fn legacy_upload_path_is_served() {
    let harness = TestHarness::new(MockGenerator::new());

    let (status, _) = harness
        .upload("/upload", "file", "Handbook.PDF", FAKE_PDF)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(harness.state.slot.is_ready().await);
}

#[tokio::test]
async fn missing_file_part_is_rejected() {
    let harness = TestHarness::new(MockGenerator::new());

    let (status, body) = harness
        .upload("/api/v1/upload", "document", "handbook.pdf", FAKE_PDF)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "NO_FILE");
    assert_eq!(body["error"]["message"], "No file part in request");
}

#[tokio::test]
async fn non_multipart_body_is_rejected() {
    let harness = TestHarness::new(MockGenerator::new());

    let (status, body) = harness.post_json("/api/v1/upload", r#"{"file": "x"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "NO_FILE");
}

#[tokio::test]
async fn empty_filename_is_rejected() {
    let harness = TestHarness::new(MockGenerator::new());

    let (status, body) = harness.upload("/api/v1/upload", "file", "", FAKE_PDF).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "NO_FILENAME");
    assert_eq!(body["error"]["message"], "No file selected");
}

#[tokio::test]
async fn non_pdf_files_are_rejected() {
    let harness = TestHarness::new(MockGenerator::new());

    let (status, body) = harness
        .upload("/api/v1/upload", "file", "notes.txt", FAKE_PDF)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_FILE");
    assert_eq!(body["error"]["message"], "Only PDF files allowed");

    let (status, body) = harness
        .upload("/api/v1/upload", "file", "renamed.pdf", b"PK\x03\x04 zip archive")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_FILE");

    assert!(!harness.state.slot.is_ready().await);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let harness = TestHarness::build(
        MockGenerator::new(),
        Arc::new(StubExtractor::returning(handbook())),
        2 * 1024 * 1024,
        None,
    );
    let mut content = FAKE_PDF.to_vec();
    content.resize(2 * 1024 * 1024 + 1, b' ');

    let (status, body) = harness
        .upload("/api/v1/upload", "file", "huge.pdf", &content)
        .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"]["code"], "FILE_TOO_LARGE");
    assert_eq!(body["error"]["message"], "File too large (max 2MB).");
    assert!(!harness.state.slot.is_ready().await);
}

#[tokio::test]
async fn extraction_failure_reports_upload_failed() {
    let harness = TestHarness::with_extractor(
        MockGenerator::new(),
        StubExtractor::failing("failed to extract text from PDF: encrypted"),
    );

    let (status, body) = harness
        .upload("/api/v1/upload", "file", "locked.pdf", FAKE_PDF)
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "UPLOAD_FAILED");
    assert_eq!(
        body["error"]["message"],
        "failed to extract text from PDF: encrypted"
    );
}

#[tokio::test]
async fn document_without_text_is_not_activated() {
    let harness = TestHarness::with_extractor(
        MockGenerator::new(),
        StubExtractor::returning(vec![ParsedElement::image(
            "el_000001",
            1,
            Some(1),
            Some("Org chart".to_string()),
        )]),
    );

    let (status, body) = harness
        .upload("/api/v1/upload", "file", "scan.pdf", FAKE_PDF)
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "UPLOAD_FAILED");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("no text chunks"));

    let (status, _) = harness
        .post_json("/chat", r#"{"query": "Who runs finance?"}"#)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn failed_upload_keeps_the_previous_document() {
    let harness = TestHarness::new(MockGenerator::new());
    harness.upload_handbook().await;

    let (status, _) = harness
        .upload("/api/v1/upload", "file", "notes.txt", FAKE_PDF)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let document = harness.state.slot.current().await.expect("document active");
    assert_eq!(document.name(), Some("handbook.pdf"));
}

#[tokio::test]
async fn overlapping_uploads_leave_the_later_one_active() {
    let harness = TestHarness::with_extractor(
        MockGenerator::new(),
        SlowFirstExtractor::new(Duration::from_millis(200)),
    );

    let first = harness.upload("/api/v1/upload", "file", "first.pdf", FAKE_PDF);
    let second = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        harness
            .upload("/api/v1/upload", "file", "second.pdf", FAKE_PDF)
            .await
    };
    let ((first_status, _), (second_status, _)) = tokio::join!(first, second);

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    let document = harness.state.slot.current().await.expect("document active");
    assert_eq!(document.name(), Some("second.pdf"));
}

#[tokio::test]
async fn upload_writes_artifacts_when_configured() {
    let dir = tempfile::tempdir().unwrap();
    let harness = TestHarness::build(
        MockGenerator::new(),
        Arc::new(StubExtractor::returning(handbook())),
        DEFAULT_MAX_UPLOAD,
        Some(dir.path()),
    );

    harness.upload_handbook().await;

    for name in [
        doc_rag::artifacts::PARSED_ELEMENTS,
        doc_rag::artifacts::TEXT_ELEMENTS,
        doc_rag::artifacts::CHUNKS,
    ] {
        assert!(dir.path().join(name).exists(), "missing {}", name);
    }
}

#[tokio::test]
async fn get_on_upload_is_not_allowed() {
    let harness = TestHarness::new(MockGenerator::new());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1/upload")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .unwrap();
    let (status, _) = harness.send(request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
