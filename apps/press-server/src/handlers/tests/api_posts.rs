use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use serde_json::{Value, json};
use uuid::Uuid;

use press_core::domain::UploadedFile;
use press_core::ports::FileStorage;
use press_infra::LocalDiskStorage;
use press_infra::storage::hash_name;

use crate::middleware::form::MAX_MULTIPART_BYTES;

use super::support::{MultipartBody, TestApp, bearer, state_with};

#[actix_web::test]
async fn test_index_lists_every_post() {
    let app = TestApp::new();
    let mut seeded = Vec::new();
    for title in ["first", "second", "third"] {
        seeded.push(app.seed(title).await);
    }
    let service = init_app!(app);

    let req = TestRequest::get().uri("/api/posts").to_request();
    let body: Vec<Value> = test::call_and_read_body_json(&service, req).await;

    assert_eq!(body.len(), seeded.len());
    for (entry, post) in body.iter().zip(&seeded) {
        assert_eq!(entry["id"], post.id.to_string());
        assert_eq!(entry["title"], post.title);
        assert_eq!(entry["description"], post.description);
        assert_eq!(entry["image"], json!(post.image));
    }
}

#[actix_web::test]
async fn test_show_returns_resource() {
    let app = TestApp::new();
    let post = app.seed("hello").await;
    let service = init_app!(app);

    let req = TestRequest::get()
        .uri(&format!("/api/posts/{}", post.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&service, req).await;

    assert_eq!(body["id"], post.id.to_string());
    assert_eq!(body["created_at"], post.created_at.format("%Y-%m-%d").to_string());
}

#[actix_web::test]
async fn test_show_unknown_or_malformed_id_is_404() {
    let app = TestApp::new();
    let service = init_app!(app);

    for uri in [format!("/api/posts/{}", Uuid::new_v4()), "/api/posts/42".to_string()] {
        let req = TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[actix_web::test]
async fn test_store_with_image_creates_post() {
    let app = TestApp::new();
    let service = init_app!(app);
    let pixels = b"\xff\xd8\xff fake jpeg";

    let req = MultipartBody::new()
        .text("title", "Title")
        .text("description", "Body")
        .file("image", "img.jpg", pixels)
        .attach(TestRequest::post().uri("/api/posts"))
        .to_request();
    let resp = test::call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let expected = format!("images/{}", hash_name(&UploadedFile::new("img.jpg", pixels.to_vec())));
    assert_eq!(body["title"], "Title");
    assert_eq!(body["image"], expected);
    assert!(expected.ends_with(".jpg"));
    assert!(app.storage.exists(&expected).await);
    assert_eq!(app.count().await, 1);
}

#[actix_web::test]
async fn test_store_writes_image_to_local_disk() {
    let root = tempfile::tempdir().unwrap();
    let state = state_with(std::sync::Arc::new(LocalDiskStorage::new(root.path())));
    let service = test::init_service(
        actix_web::App::new()
            .app_data(actix_web::web::Data::new(state))
            .configure(crate::handlers::configure_routes),
    )
    .await;

    let req = MultipartBody::new()
        .text("title", "On disk")
        .text("description", "Body")
        .file("image", "photo.JPG", b"disk bytes")
        .attach(TestRequest::post().uri("/api/posts"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&service, req).await;

    let path = body["image"].as_str().unwrap();
    assert!(path.starts_with("images/") && path.ends_with(".jpg"));
    let written = tokio::fs::read(root.path().join(path)).await.unwrap();
    assert_eq!(written, b"disk bytes");
}

#[actix_web::test]
async fn test_store_without_image_is_allowed() {
    let app = TestApp::new();
    let service = init_app!(app);

    let req = TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({"title": "Title", "description": "Body"}))
        .to_request();
    let resp = test::call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["image"], Value::Null);
    assert!(app.storage.paths().await.is_empty());
}

#[actix_web::test]
async fn test_store_ignores_unknown_parts() {
    let app = TestApp::new();
    let service = init_app!(app);

    let req = MultipartBody::new()
        .text("title", "Title")
        .text("description", "Body")
        .file("attachment", "extra.bin", b"not an image field")
        .attach(TestRequest::post().uri("/api/posts"))
        .to_request();
    let resp = test::call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(app.storage.paths().await.is_empty());
}

#[actix_web::test]
async fn test_store_caps_total_multipart_size() {
    let app = TestApp::new();
    let service = init_app!(app);
    let junk = vec![b'x'; MAX_MULTIPART_BYTES / 2];

    let req = MultipartBody::new()
        .text("title", "Title")
        .text("description", "Body")
        .file("junk0", "a.bin", &junk)
        .file("junk1", "b.bin", &junk)
        .file("junk2", "c.bin", &junk)
        .attach(TestRequest::post().uri("/api/posts"))
        .to_request();
    let resp = test::call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.count().await, 0);
}

#[actix_web::test]
async fn test_store_rejects_empty_title() {
    let app = TestApp::new();
    let service = init_app!(app);

    let req = MultipartBody::new()
        .text("title", "")
        .text("description", "Body")
        .attach(TestRequest::post().uri("/api/posts"))
        .to_request();
    let resp = test::call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"]["title"][0], "The title field is required.");
    assert_eq!(app.count().await, 0);
}

#[actix_web::test]
async fn test_store_rejects_text_image() {
    let app = TestApp::new();
    let service = init_app!(app);

    let req = TestRequest::post()
        .uri("/api/posts")
        .set_form(vec![("title", "Title"), ("description", "Body"), ("image", "sdfdsdf")])
        .to_request();
    let resp = test::call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"]["image"][0], "The image field must be a file.");
    assert_eq!(app.count().await, 0);
}

#[actix_web::test]
async fn test_update_replaces_fields_in_place() {
    let app = TestApp::new();
    let post = app.seed("before").await;
    let service = init_app!(app);

    let req = MultipartBody::new()
        .text("title", "after")
        .text("description", "new body")
        .file("image", "new.png", b"new pixels")
        .attach(TestRequest::patch().uri(&format!("/api/posts/{}", post.id)))
        .to_request();
    let resp = test::call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], post.id.to_string());
    assert_eq!(body["title"], "after");
    assert_eq!(body["description"], "new body");
    assert_ne!(body["image"], json!(post.image));
    assert!(body["image"].as_str().unwrap().ends_with(".png"));
    assert_eq!(app.count().await, 1);
}

#[actix_web::test]
async fn test_update_keeps_fields_that_were_not_sent() {
    let app = TestApp::new();
    let post = app.seed("keep").await;
    let service = init_app!(app);

    let req = TestRequest::put()
        .uri(&format!("/api/posts/{}", post.id))
        .set_json(json!({"title": "renamed"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&service, req).await;

    assert_eq!(body["title"], "renamed");
    assert_eq!(body["description"], post.description);
    assert_eq!(body["image"], json!(post.image));
}

#[actix_web::test]
async fn test_update_unknown_post_is_404() {
    let app = TestApp::new();
    let service = init_app!(app);

    let req = TestRequest::patch()
        .uri(&format!("/api/posts/{}", Uuid::new_v4()))
        .set_json(json!({"title": ""}))
        .to_request();
    let resp = test::call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_destroy_requires_authentication() {
    let app = TestApp::new();
    let post = app.seed("keep me").await;
    let service = init_app!(app);

    let req = TestRequest::delete()
        .uri(&format!("/api/posts/{}", post.id))
        .to_request();
    let resp = test::call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert_eq!(app.count().await, 1);
}

#[actix_web::test]
async fn test_destroy_with_bad_token_is_rejected() {
    let app = TestApp::new();
    let post = app.seed("keep me").await;
    let service = init_app!(app);

    let req = TestRequest::delete()
        .uri(&format!("/api/posts/{}", post.id))
        .insert_header(bearer("not-a-jwt"))
        .to_request();
    let resp = test::call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.count().await, 1);
}

#[actix_web::test]
async fn test_destroy_removes_exactly_one_post() {
    let app = TestApp::new();
    let doomed = app.seed("doomed").await;
    let survivor = app.seed("survivor").await;
    let service = init_app!(app);

    let req = TestRequest::delete()
        .uri(&format!("/api/posts/{}", doomed.id))
        .insert_header(bearer(&app.token()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&service, req).await;

    assert_eq!(body, json!({"message": "deleted"}));
    assert_eq!(app.count().await, 1);
    assert!(app.state.posts.show(survivor.id).await.is_ok());
    // Old images stay on the disk.
    assert!(app.storage.exists(doomed.image.as_deref().unwrap()).await);
}

#[actix_web::test]
async fn test_destroy_unknown_post_is_404() {
    let app = TestApp::new();
    let service = init_app!(app);

    let req = TestRequest::delete()
        .uri(&format!("/api/posts/{}", Uuid::new_v4()))
        .insert_header(bearer(&app.token()))
        .to_request();
    let resp = test::call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_stored_image_is_served() {
    let app = TestApp::new();
    let post = app.seed("pictured").await;
    let service = init_app!(app);

    let path = post.image.unwrap();
    let req = TestRequest::get().uri(&format!("/storage/{path}")).to_request();
    let resp = test::call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "image/jpeg");
    let bytes = test::read_body(resp).await;
    assert_eq!(&bytes[..], b"pixels of pictured");

    let req = TestRequest::get().uri("/storage/images/missing.jpg").to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
