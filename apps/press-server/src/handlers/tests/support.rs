use std::sync::Arc;

use actix_web::http::header;
use actix_web::test::TestRequest;
use uuid::Uuid;

use press_core::domain::{Post, UploadedFile};
use press_core::validation::{FieldValue, PostForm};
use press_core::ports::FileStorage;
use press_infra::{InMemoryPostRepository, InMemoryStorage, InMemoryUserRepository, JwtConfig};

use crate::state::AppState;

pub const BOUNDARY: &str = "press-test-boundary";

/// Build an initialized service from a [`TestApp`].
macro_rules! init_app {
    ($app:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($app.state.clone()))
                .configure(crate::handlers::configure_routes),
        )
        .await
    };
}

/// Application state over in-memory adapters, with handles kept for assertions.
pub struct TestApp {
    pub state: AppState,
    pub storage: Arc<InMemoryStorage>,
}

impl TestApp {
    pub fn new() -> Self {
        let storage = Arc::new(InMemoryStorage::new());
        Self {
            state: state_with(storage.clone()),
            storage,
        }
    }

    /// Create a post through the service, bypassing HTTP.
    pub async fn seed(&self, title: &str) -> Post {
        let form: PostForm = [
            ("title".to_string(), FieldValue::Text(title.to_string())),
            (
                "description".to_string(),
                FieldValue::Text(format!("About {title}")),
            ),
            (
                "image".to_string(),
                FieldValue::File(UploadedFile::new("seed.jpg", format!("pixels of {title}"))),
            ),
        ]
        .into_iter()
        .collect();

        self.state.posts.create(form).await.unwrap()
    }

    pub async fn count(&self) -> u64 {
        self.state.posts.count().await.unwrap()
    }

    /// A valid access token for a freshly invented user.
    pub fn token(&self) -> String {
        self.state
            .tokens
            .generate_token(Uuid::new_v4(), "editor@example.com", vec!["user".to_string()])
            .unwrap()
    }
}

/// State over in-memory repositories and the given disk.
pub fn state_with(storage: Arc<dyn FileStorage>) -> AppState {
    AppState::from_parts(
        Arc::new(InMemoryPostRepository::new()),
        Arc::new(InMemoryUserRepository::new()),
        storage,
        JwtConfig {
            secret: "test-secret".to_string(),
            ..JwtConfig::default()
        },
    )
}

/// Hand-assembled `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Attach the body to `req` with the matching content type.
    pub fn attach(mut self, req: TestRequest) -> TestRequest {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        req.insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(self.body)
    }
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}
