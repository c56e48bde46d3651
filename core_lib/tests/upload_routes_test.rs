use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use core_lib::{create_app_with_config, AppConfig, AppState};
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "test-boundary-X7zq4fTk";

struct FormBuilder {
    body: Vec<u8>,
}

impl FormBuilder {
    fn new() -> Self {
        Self { body: Vec::new() }
    }

    fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    fn file(mut self, field: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, field, filename, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn build(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        self.body
    }
}

fn test_app(dir: &TempDir) -> Router {
    let mut config = AppConfig::default();
    config.uploads.destination = dir.path().to_path_buf();

    let state = AppState::new(&config);
    create_app_with_config(state, config)
}

fn form_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn response_json(response: Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_single_upload_returns_file_metadata() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let body = FormBuilder::new()
        .text("caption", "holiday")
        .file("image", "photo.png", "image/png", b"fake png bytes")
        .build();

    let response = app
        .oneshot(form_request("/api/v1/images/single", body))
        .await
        .unwrap();
    let (status, json) = response_json(response).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["ok"], true);
    assert_eq!(json["data"]["body"]["caption"], "holiday");

    let file = &json["data"]["file"];
    assert_eq!(file["fieldName"], "image");
    assert_eq!(file["originalName"], "photo.png");
    assert_eq!(file["mimeType"], "image/png");
    assert_eq!(file["sizeBytes"], 14);

    let stored_name = file["storedName"].as_str().unwrap();
    assert!(stored_name.starts_with("img-"));
    assert!(stored_name.ends_with(".png"));

    let on_disk = std::fs::read(file["storedPath"].as_str().unwrap()).unwrap();
    assert_eq!(on_disk, b"fake png bytes");
}

#[tokio::test]
async fn test_single_without_file_returns_null_file() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let body = FormBuilder::new().text("note", "no file here").build();

    let response = app
        .oneshot(form_request("/api/v1/images/single", body))
        .await
        .unwrap();
    let (status, json) = response_json(response).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["ok"], true);
    assert_eq!(json["data"]["body"]["note"], "no file here");
    assert!(json["data"]["file"].is_null());
}

#[tokio::test]
async fn test_single_with_two_files_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let body = FormBuilder::new()
        .file("image", "a.png", "image/png", b"a")
        .file("image", "b.png", "image/png", b"b")
        .build();

    let response = app
        .oneshot(form_request("/api/v1/images/single", body))
        .await
        .unwrap();
    let (status, json) = response_json(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["ok"], false);
    assert!(json["error"].as_str().unwrap().contains("image"));
}

#[tokio::test]
async fn test_array_accepts_five_pngs() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let mut builder = FormBuilder::new();
    for i in 0..5 {
        builder = builder.file(
            "images",
            &format!("pic-{}.png", i),
            "image/png",
            b"png data",
        );
    }

    let response = app
        .oneshot(form_request("/api/v1/images/array", builder.build()))
        .await
        .unwrap();
    let (status, json) = response_json(response).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["ok"], true);

    let files = json["data"]["files"].as_array().unwrap();
    assert_eq!(files.len(), 5);
    for (i, file) in files.iter().enumerate() {
        assert_eq!(file["originalName"], format!("pic-{}.png", i));
        assert_eq!(file["fieldName"], "images");
    }

    // Stored names are unique across files of the same request.
    let stored: std::collections::HashSet<&str> = files
        .iter()
        .map(|f| f["storedName"].as_str().unwrap())
        .collect();
    assert_eq!(stored.len(), 5);
}

#[tokio::test]
async fn test_array_with_six_files_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let mut builder = FormBuilder::new();
    for i in 0..6 {
        builder = builder.file(
            "images",
            &format!("pic-{}.png", i),
            "image/png",
            b"png data",
        );
    }

    let response = app
        .oneshot(form_request("/api/v1/images/array", builder.build()))
        .await
        .unwrap();
    let (status, json) = response_json(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["ok"], false);
    assert!(json["error"].as_str().unwrap().contains("images"));
}

#[tokio::test]
async fn test_gif_is_rejected_on_every_route() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let routes = [
        ("/api/v1/images/single", "image"),
        ("/api/v1/images/array", "images"),
        ("/api/v1/images/fields", "images"),
    ];

    for (uri, field) in routes {
        let body = FormBuilder::new()
            .file(field, "anim.gif", "image/gif", b"GIF89a")
            .build();

        let response = app.clone().oneshot(form_request(uri, body)).await.unwrap();
        let (status, json) = response_json(response).await;

        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE, "route {}", uri);
        assert_eq!(json["ok"], false);
        assert_eq!(
            json["error"],
            "Images only. Accepted file types: jpeg, jpg, png."
        );
    }
}

#[tokio::test]
async fn test_gif_mime_with_png_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let body = FormBuilder::new()
        .file("image", "sneaky.png", "image/gif", b"GIF89a")
        .build();

    let response = app
        .oneshot(form_request("/api/v1/images/single", body))
        .await
        .unwrap();
    let (status, _) = response_json(response).await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_fields_groups_files_by_field_name() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let mut builder = FormBuilder::new().text("album", "summer");
    for i in 0..3 {
        builder = builder.file("images", &format!("img-{}.jpg", i), "image/jpeg", b"jpg");
    }
    for i in 0..2 {
        builder = builder.file("photos", &format!("ph-{}.png", i), "image/png", b"png");
    }

    let response = app
        .oneshot(form_request("/api/v1/images/fields", builder.build()))
        .await
        .unwrap();
    let (status, json) = response_json(response).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["body"]["album"], "summer");
    assert_eq!(json["data"]["files"]["images"].as_array().unwrap().len(), 3);
    assert_eq!(json["data"]["files"]["photos"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_fields_with_four_images_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let mut builder = FormBuilder::new();
    for i in 0..4 {
        builder = builder.file("images", &format!("img-{}.jpg", i), "image/jpeg", b"jpg");
    }

    let response = app
        .oneshot(form_request("/api/v1/images/fields", builder.build()))
        .await
        .unwrap();
    let (status, json) = response_json(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["ok"], false);
}

#[tokio::test]
async fn test_fields_rejects_unknown_file_field() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let body = FormBuilder::new()
        .file("avatar", "me.png", "image/png", b"png")
        .build();

    let response = app
        .oneshot(form_request("/api/v1/images/fields", body))
        .await
        .unwrap();
    let (status, json) = response_json(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("avatar"));
}

#[tokio::test]
async fn test_size_limit_boundary() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let at_limit = FormBuilder::new()
        .file("image", "big.png", "image/png", &vec![0u8; 5_000_000])
        .build();

    let response = app
        .clone()
        .oneshot(form_request("/api/v1/images/single", at_limit))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let over_limit = FormBuilder::new()
        .file("image", "huge.png", "image/png", &vec![0u8; 5_000_001])
        .build();

    let response = app
        .oneshot(form_request("/api/v1/images/single", over_limit))
        .await
        .unwrap();
    let (status, json) = response_json(response).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["ok"], false);
}

#[tokio::test]
async fn test_text_fields_echoed_verbatim() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let body = FormBuilder::new()
        .text("title", "Strandfoto")
        .text("note", "crème brûlée ☀")
        .build();

    let response = app
        .oneshot(form_request("/api/v1/images/array", body))
        .await
        .unwrap();
    let (status, json) = response_json(response).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["body"]["title"], "Strandfoto");
    assert_eq!(json["data"]["body"]["note"], "crème brûlée ☀");
    assert_eq!(json["data"]["files"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_stored_names_unique_across_concurrent_requests() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let requests = (0..5).map(|i| {
        let app = app.clone();
        async move {
            let body = FormBuilder::new()
                .file("image", &format!("c-{}.png", i), "image/png", b"data")
                .build();
            app.oneshot(form_request("/api/v1/images/single", body))
                .await
                .unwrap()
        }
    });

    let responses = futures_util::future::join_all(requests).await;

    let mut stored = std::collections::HashSet::new();
    for response in responses {
        let (status, json) = response_json(response).await;
        assert_eq!(status, StatusCode::CREATED);
        stored.insert(
            json["data"]["file"]["storedName"]
                .as_str()
                .unwrap()
                .to_string(),
        );
    }

    assert_eq!(stored.len(), 5);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let body = FormBuilder::new().text("k", "v").build();
    let mut request = form_request("/api/v1/images/single", body);
    request
        .headers_mut()
        .insert(header::ORIGIN, "https://example.com".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_health_endpoint() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let (status, json) = response_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert_eq!(json["data"]["status"], "healthy");
}
