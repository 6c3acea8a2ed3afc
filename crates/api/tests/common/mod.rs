//! Shared test harness: in-memory trait implementations, router
//! construction, and request helpers.
//!
//! Mirrors the router construction in `main.rs` (via `build_app_router`) so
//! integration tests exercise the same middleware stack that production
//! uses, with every upstream replaced by an in-memory fake.

// Each test binary uses its own subset of this harness.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use faceglow_ai::{AiError, AiResult, ChatModel, ChatRequest, ImageModel};
use faceglow_cloud::traits::CategoryUpdate;
use faceglow_cloud::types::{AlbumListQuery, AlbumPage, UploadedFile, UsageOverview};
use faceglow_cloud::{
    AlbumStore, AnalyticsSource, CategoryStore, CloudError, CloudResult, FileStore,
};
use faceglow_core::album::{AlbumDraft, AlbumRecord, AlbumUpdate};
use faceglow_core::category::{CategoryConfig, CategoryDraft};
use faceglow_pipeline::runner::PipelineRunner;
use http_body_util::BodyExt;
use tower::ServiceExt;

use faceglow_api::config::ServerConfig;
use faceglow_api::router::build_app_router;
use faceglow_api::sessions::Sessions;
use faceglow_api::state::AppState;

// ---------------------------------------------------------------------------
// In-memory album store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryAlbums {
    pub records: Mutex<Vec<AlbumRecord>>,
    next_id: Mutex<u64>,
}

impl InMemoryAlbums {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AlbumStore for InMemoryAlbums {
    async fn list(&self, query: &AlbumListQuery) -> CloudResult<AlbumPage> {
        let records = self.records.lock().unwrap();
        let filtered: Vec<AlbumRecord> = records
            .iter()
            .filter(|r| query.include_unpublished || r.published)
            .filter(|r| {
                query
                    .function_types
                    .as_ref()
                    .is_none_or(|codes| codes.contains(&r.function_type))
            })
            .cloned()
            .collect();

        let page = query.page.unwrap_or(1).max(1);
        let page_size = query.page_size.unwrap_or(20).max(1) as usize;
        let total = filtered.len() as u64;
        let start = (page as usize - 1) * page_size;
        let albums: Vec<AlbumRecord> = filtered.into_iter().skip(start).take(page_size).collect();
        let has_more = (start + albums.len()) < total as usize;

        Ok(AlbumPage {
            albums,
            total,
            has_more,
        })
    }

    async fn create(&self, draft: &AlbumDraft) -> CloudResult<String> {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let album_id = format!("album_{}", *next_id);

        self.records.lock().unwrap().push(AlbumRecord {
            album_id: album_id.clone(),
            album_name: draft.album_name.clone(),
            album_description: draft.album_description.clone(),
            album_image: draft.album_image.clone(),
            theme_styles: draft.theme_styles.clone(),
            function_type: draft.function_type.clone(),
            activity_tags: draft.activity_tags.clone(),
            level: draft.level,
            price: draft.price,
            likes: draft.likes,
            sort_weight: draft.sort_weight,
            published: draft.published,
            template_list: None,
            task: draft.task.clone(),
            created_at: None,
            updated_at: None,
        });
        Ok(album_id)
    }

    async fn update(&self, album_id: &str, update: &AlbumUpdate) -> CloudResult<()> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.album_id == album_id)
            .ok_or_else(|| CloudError::Api {
                message: format!("Album {album_id} not found"),
            })?;

        if let Some(name) = &update.album_name {
            record.album_name = name.clone();
        }
        if let Some(description) = &update.album_description {
            record.album_description = description.clone();
        }
        if let Some(image) = &update.album_image {
            record.album_image = image.clone();
        }
        if let Some(styles) = &update.theme_styles {
            record.theme_styles = styles.clone();
        }
        if let Some(function_type) = &update.function_type {
            record.function_type = function_type.clone();
        }
        if let Some(tags) = &update.activity_tags {
            record.activity_tags = tags.clone();
        }
        if let Some(level) = update.level {
            record.level = level;
        }
        if let Some(price) = update.price {
            record.price = price;
        }
        if let Some(sort_weight) = update.sort_weight {
            record.sort_weight = sort_weight;
        }
        if let Some(published) = update.published {
            record.published = published;
        }
        if let Some(task) = &update.task {
            record.task = task.clone();
        }
        Ok(())
    }

    async fn delete(&self, album_id: &str) -> CloudResult<()> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.album_id != album_id);
        if records.len() == before {
            return Err(CloudError::Api {
                message: format!("Album {album_id} not found"),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory category store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryCategories {
    pub records: Mutex<Vec<CategoryConfig>>,
}

impl InMemoryCategories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(records: Vec<CategoryConfig>) -> Self {
        InMemoryCategories {
            records: Mutex::new(records),
        }
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategories {
    async fn list(&self) -> CloudResult<Vec<CategoryConfig>> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn create(&self, draft: &CategoryDraft) -> CloudResult<String> {
        let category_id = draft.derived_id();
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|c| c.category_id == category_id) {
            return Err(CloudError::Api {
                message: format!("Category {category_id} already exists"),
            });
        }
        records.push(CategoryConfig {
            category_id: category_id.clone(),
            category_type: draft.category_type,
            category_code: draft.category_code.clone(),
            category_label: draft.category_label.clone(),
            category_label_zh: draft.category_label_zh.clone(),
            icon: draft.icon.clone(),
            extra_config: draft.extra_config.clone(),
            sort_order: draft.sort_order,
            is_active: draft.is_active,
            created_at: None,
            updated_at: None,
        });
        Ok(category_id)
    }

    async fn update(&self, category_id: &str, update: &CategoryUpdate) -> CloudResult<()> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|c| c.category_id == category_id)
            .ok_or_else(|| CloudError::Api {
                message: format!("Category {category_id} not found"),
            })?;

        if let Some(label) = &update.category_label {
            record.category_label = label.clone();
        }
        if let Some(label_zh) = &update.category_label_zh {
            record.category_label_zh = Some(label_zh.clone());
        }
        if let Some(icon) = &update.icon {
            record.icon = Some(icon.clone());
        }
        if let Some(extra_config) = &update.extra_config {
            record.extra_config = Some(extra_config.clone());
        }
        if let Some(sort_order) = update.sort_order {
            record.sort_order = sort_order;
        }
        if let Some(is_active) = update.is_active {
            record.is_active = is_active;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File store / analytics fakes
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeFiles {
    pub uploads: Mutex<Vec<String>>,
}

#[async_trait]
impl FileStore for FakeFiles {
    async fn upload_file(
        &self,
        _bytes: Vec<u8>,
        file_name: &str,
        folder: &str,
    ) -> CloudResult<UploadedFile> {
        self.uploads.lock().unwrap().push(file_name.to_string());
        Ok(UploadedFile {
            url: format!("https://cos.test/{folder}/{file_name}"),
            file_key: None,
        })
    }

    async fn upload_data_url(
        &self,
        _data_url: &str,
        file_name: &str,
        folder: &str,
    ) -> CloudResult<UploadedFile> {
        self.upload_file(Vec::new(), file_name, folder).await
    }
}

/// Analytics source that either serves a fixed overview or always fails.
pub struct FakeAnalytics {
    pub result: Option<UsageOverview>,
}

#[async_trait]
impl AnalyticsSource for FakeAnalytics {
    async fn overview(&self, _days: u32) -> CloudResult<UsageOverview> {
        match &self.result {
            Some(overview) => Ok(overview.clone()),
            None => Err(CloudError::Api {
                message: "stats unavailable".into(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Model fakes
// ---------------------------------------------------------------------------

/// Chat model that inspects the request's model name to answer describe,
/// rewrite and metadata calls with canned responses.
pub struct CannedChat {
    pub metadata_json: String,
}

impl Default for CannedChat {
    fn default() -> Self {
        CannedChat {
            metadata_json: r#"{"album_name":"Test Album","album_description":"A test album","theme_styles":["winter"],"activity_tags":[]}"#
                .to_string(),
        }
    }
}

#[async_trait]
impl ChatModel for CannedChat {
    async fn complete(&self, request: ChatRequest) -> AiResult<String> {
        if request.model == faceglow_ai::prompts::DESCRIBE_MODEL {
            return Ok("a person in a snowy park".to_string());
        }
        // Text model serves both rewrite and metadata; metadata requests run
        // with a higher token budget.
        if request.max_tokens == 1000 {
            return Ok(self.metadata_json.clone());
        }
        Ok("the person in the image stands in a snowy park".to_string())
    }
}

/// Image model returning sequential URLs, or failing everything.
pub struct CannedImage {
    pub fail: bool,
    pub calls: Mutex<usize>,
}

impl Default for CannedImage {
    fn default() -> Self {
        CannedImage {
            fail: false,
            calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl ImageModel for CannedImage {
    async fn generate(&self, _prompt: &str, _source_data_url: &str) -> AiResult<String> {
        if self.fail {
            return Err(AiError::Api {
                status: 500,
                body: "generation failed".into(),
            });
        }
        let mut calls = self.calls.lock().unwrap();
        *calls += 1;
        Ok(format!("https://cdn.test/cover_{}.png", *calls))
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        cloud_function_base_url: "http://cloud.test".to_string(),
        chat_base_url: "http://chat.test".to_string(),
        chat_api_key: "test-key".to_string(),
        image_base_url: "http://image.test".to_string(),
        image_api_key: "test-key".to_string(),
    }
}

/// Fully assembled fake backends, handed back so tests can inspect them.
pub struct TestBackends {
    pub albums: Arc<InMemoryAlbums>,
    pub categories: Arc<InMemoryCategories>,
    pub files: Arc<FakeFiles>,
}

pub struct TestAppBuilder {
    albums: Arc<InMemoryAlbums>,
    categories: Arc<InMemoryCategories>,
    files: Arc<FakeFiles>,
    analytics: Arc<FakeAnalytics>,
    chat: Arc<CannedChat>,
    image: Arc<CannedImage>,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        TestAppBuilder {
            albums: Arc::new(InMemoryAlbums::new()),
            categories: Arc::new(InMemoryCategories::new()),
            files: Arc::new(FakeFiles::default()),
            analytics: Arc::new(FakeAnalytics {
                result: Some(UsageOverview::default()),
            }),
            chat: Arc::new(CannedChat::default()),
            image: Arc::new(CannedImage::default()),
        }
    }
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn categories(mut self, categories: InMemoryCategories) -> Self {
        self.categories = Arc::new(categories);
        self
    }

    pub fn analytics(mut self, analytics: FakeAnalytics) -> Self {
        self.analytics = Arc::new(analytics);
        self
    }

    pub fn image(mut self, image: CannedImage) -> Self {
        self.image = Arc::new(image);
        self
    }

    pub fn build(self) -> (Router, TestBackends) {
        let config = test_config();
        let runner = PipelineRunner::new(
            self.chat.clone(),
            self.image.clone(),
            self.files.clone(),
            self.albums.clone(),
        );
        let state = AppState {
            config: Arc::new(config.clone()),
            albums: self.albums.clone(),
            categories: self.categories.clone(),
            files: self.files.clone(),
            analytics: self.analytics.clone(),
            runner,
            sessions: Arc::new(Sessions::new()),
        };
        let app = build_app_router(state, &config);
        (
            app,
            TestBackends {
                albums: self.albums,
                categories: self.categories,
                files: self.files,
            },
        )
    }
}

/// Build the application router with default fakes.
pub fn build_test_app() -> Router {
    TestAppBuilder::new().build().0
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, "POST", uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, "PUT", uri, body).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, "PATCH", uri, body).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// POST an empty body (for action endpoints like generate and commit).
pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Multipart image upload with a role field.
pub async fn post_image(app: Router, uri: &str, role: &str, file_name: &str) -> Response<Body> {
    let boundary = "test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"role\"\r\n\r\n\
         {role}\r\n\
         --{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
         Content-Type: image/png\r\n\r\n\
         fakepngbytes\r\n\
         --{boundary}--\r\n"
    );
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Multipart batch form post: a JSON `record` part plus named file parts
/// given as `(part_name, file_name, content_type)`.
pub async fn post_batch_form(
    app: Router,
    uri: &str,
    record: serde_json::Value,
    files: &[(&str, &str, &str)],
) -> Response<Body> {
    let boundary = "test-boundary";
    let mut body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"record\"\r\n\r\n\
         {record}\r\n"
    );
    for (name, file_name, content_type) in files {
        body.push_str(&format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
             Content-Type: {content_type}\r\n\r\n\
             fakefilebytes\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the standard error envelope shape and return it.
pub async fn expect_error(response: Response<Body>, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code);
    assert!(json["error"].is_string());
}
