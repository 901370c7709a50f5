use actix_web::{http::StatusCode, test, web, App};
use dirview::config::Settings;
use dirview::handlers::{configure, static_handler};
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn fixture() -> (TempDir, Settings) {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("foo/bar")).unwrap();
    fs::write(dir.path().join("foo/readme.txt"), b"hello").unwrap();
    fs::write(dir.path().join("top.txt"), b"top").unwrap();
    let settings = Settings::new(dir.path(), "127.0.0.1".to_string(), 0, None).unwrap();
    (dir, settings)
}

macro_rules! app {
    ($settings:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($settings))
                .configure(configure)
                .default_service(web::to(static_handler)),
        )
        .await
    };
}

#[actix_web::test]
async fn root_listing_without_path_param() {
    let (_dir, settings) = fixture();
    let base = settings.base_dir.display().to_string();
    let app = app!(settings);

    let req = test::TestRequest::get().uri("/api/directory").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["basePath"], base);
    assert_eq!(body["absolutePath"], base);
    assert_eq!(body["requestedPath"], "");
    assert!(body["parentPath"].is_null());
    assert_eq!(body["breadcrumbs"].as_array().unwrap().len(), 1);
    assert_eq!(body["breadcrumbs"][0]["path"], "");

    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["name"], "foo");
    assert_eq!(entries[0]["type"], "directory");
    assert_eq!(entries[1]["name"], "top.txt");
    assert_eq!(entries[1]["type"], "file");
    assert_eq!(entries[1]["size"], 3);
    assert_eq!(entries[1]["relativePath"], "top.txt");
}

#[actix_web::test]
async fn nested_listing_has_parent_and_breadcrumbs() {
    let (_dir, settings) = fixture();
    let app = app!(settings);

    let req = test::TestRequest::get().uri("/api/directory?path=foo").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["parentPath"], "");
    assert_eq!(body["breadcrumbs"][1]["label"], "foo");
    assert_eq!(body["breadcrumbs"][1]["path"], "foo");
    let names: Vec<_> = body["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["relativePath"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["foo/bar", "foo/readme.txt"]);
}

#[actix_web::test]
async fn empty_directory_lists_nothing() {
    let (_dir, settings) = fixture();
    let app = app!(settings);

    let req = test::TestRequest::get().uri("/api/directory?path=foo/bar").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["entries"], Value::Array(vec![]));
    assert_eq!(body["parentPath"], "foo");
}

#[actix_web::test]
async fn traversal_is_rejected_without_leaking_paths() {
    let (_dir, settings) = fixture();
    let base = settings.base_dir.display().to_string();
    let app = app!(settings);

    let req = test::TestRequest::get()
        .uri("/api/directory?path=..%2F..%2Fetc")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    let message = body["error"].as_str().unwrap();
    assert!(!message.is_empty());
    assert!(!message.contains(&base));
}

#[actix_web::test]
async fn file_and_missing_paths_are_bad_requests() {
    let (_dir, settings) = fixture();
    let app = app!(settings);

    for uri in ["/api/directory?path=top.txt", "/api/directory?path=nope"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }
}

#[actix_web::test]
async fn malformed_query_is_a_json_bad_request() {
    let (_dir, settings) = fixture();
    let app = app!(settings);

    let req = test::TestRequest::get()
        .uri("/api/directory?path=a&path=b")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.headers().get("content-type").unwrap().to_str().unwrap(),
        "application/json"
    );

    let body: Value = test::read_body_json(resp).await;
    let message = body["error"].as_str().unwrap();
    assert!(!message.contains("duplicate"));
}

#[actix_web::test]
async fn connect_reports_success() {
    let (_dir, settings) = fixture();
    let app = app!(settings);

    let req = test::TestRequest::get().uri("/api/connect").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
}

#[actix_web::test]
async fn serves_embedded_ui() {
    let (_dir, settings) = fixture();
    let app = app!(settings);

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap().to_str().unwrap(),
        "text/html"
    );

    let req = test::TestRequest::get().uri("/missing.js").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
