//! Listing and download integration tests.
//!
//! Run with: `cargo test -p nbdrop-api --test files_test`

mod helpers;

use helpers::setup_test_app;

#[tokio::test]
async fn test_root_banner() {
    let app = setup_test_app().await;

    let response = app.client().get("/").await;

    assert_eq!(response.status_code(), 200);
    assert!(response.text().contains("Backend is running"));
}

#[tokio::test]
async fn test_health_reports_disabled_mirror() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["mirror"], "disabled");
}

#[tokio::test]
async fn test_list_is_sorted_html() {
    let app = setup_test_app().await;
    app.store.write("b_20250101_000000.ipynb", b"{}").await.unwrap();
    app.store.write("a_20250101_000000_x.csv", b"1").await.unwrap();

    let response = app.client().get("/list").await;

    assert_eq!(response.status_code(), 200);
    let html = response.text();
    assert!(html.starts_with("<h2>Saved files:</h2><ul>"));
    let a = html
        .find(r#"<a href="/saved_results/a_20250101_000000_x.csv">a_20250101_000000_x.csv</a>"#)
        .expect("a listed");
    let b = html
        .find(r#"<a href="/saved_results/b_20250101_000000.ipynb">b_20250101_000000.ipynb</a>"#)
        .expect("b listed");
    assert!(a < b);
}

#[tokio::test]
async fn test_list_escapes_names() {
    let app = setup_test_app().await;
    std::fs::write(app.store.base_path().join("<b>.csv"), b"1").unwrap();

    let response = app.client().get("/list").await;

    let html = response.text();
    assert!(html.contains("&lt;b&gt;.csv"));
    assert!(html.contains("/saved_results/%3Cb%3E.csv"));
    assert!(!html.contains("<b>.csv"));
}

#[tokio::test]
async fn test_list_after_upload_contains_name_once() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/upload_csv")
        .json(&serde_json::json!({
            "participant_id": "p1",
            "filename": "a.csv",
            "content_b64": "aGVsbG8="
        }))
        .await;
    let body: serde_json::Value = response.json();
    let name = body["local_filename"].as_str().unwrap().to_string();

    let html = app.client().get("/list").await.text();
    assert_eq!(html.matches(&format!(">{}<", name)).count(), 1);
}

#[tokio::test]
async fn test_serve_file_as_attachment() {
    let app = setup_test_app().await;
    app.store.write("p1_20250101_000000_a.csv", b"hello").await.unwrap();

    let response = app
        .client()
        .get("/saved_results/p1_20250101_000000_a.csv")
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(&response.as_bytes()[..], b"hello");
    let disposition = response.header("content-disposition");
    assert!(disposition
        .to_str()
        .unwrap()
        .starts_with("attachment; filename=\"p1_20250101_000000_a.csv\""));
    assert_eq!(response.header("content-type").to_str().unwrap(), "text/csv");
}

#[tokio::test]
async fn test_serve_missing_file_is_404() {
    let app = setup_test_app().await;

    let response = app.client().get("/saved_results/never_written.csv").await;

    assert_eq!(response.status_code(), 404);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_serve_rejects_traversal() {
    let app = setup_test_app().await;
    let outside = app.store.base_path().parent().unwrap().join("secret.txt");
    std::fs::write(&outside, b"top secret").unwrap();

    let response = app.client().get("/saved_results/..%2Fsecret.txt").await;
    assert_eq!(response.status_code(), 400);
    assert!(!response.text().contains("top secret"));

    let response = app
        .client()
        .get("/saved_results/..%2F..%2F..%2Fetc%2Fpasswd")
        .await;
    assert_eq!(response.status_code(), 400);

    let response = app.client().get("/saved_results/../secret.txt").await;
    assert_ne!(response.status_code(), 200);
    assert!(!response.text().contains("top secret"));
}
