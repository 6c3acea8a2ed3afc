//! HTTP implementation of the cloud function traits.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;

use faceglow_core::album::{AlbumDraft, AlbumUpdate};
use faceglow_core::category::{CategoryConfig, CategoryDraft};

use crate::envelope::Envelope;
use crate::error::{CloudError, CloudResult};
use crate::traits::{AlbumStore, AnalyticsSource, CategoryStore, CategoryUpdate, FileStore};
use crate::types::{AlbumListQuery, AlbumPage, UploadedFile, UsageOverview};

/// Timeout for regular CRUD calls.
const CRUD_TIMEOUT: Duration = Duration::from_secs(30);
/// Timeout for uploads, which carry file bodies.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the cloud function endpoint set.
///
/// Every operation is a POST against `{base_url}/{function_name}` answering
/// with the standard envelope.
#[derive(Clone)]
pub struct CloudClient {
    client: reqwest::Client,
    base_url: String,
}

impl CloudClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Reuse an existing [`reqwest::Client`] for connection pooling.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        function: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> CloudResult<Envelope<T>> {
        let response = self
            .client
            .post(format!("{}/{function}", self.base_url))
            .timeout(timeout)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            CloudError::Decode(format!("{function} returned unparseable body ({status}): {e}"))
        })
    }
}

#[async_trait]
impl AlbumStore for CloudClient {
    async fn list(&self, query: &AlbumListQuery) -> CloudResult<AlbumPage> {
        let body = json!({
            "page": query.page.unwrap_or(1),
            "page_size": query.page_size.unwrap_or(20),
            "function_types": query.function_types,
            "theme_styles": query.theme_styles,
            "activity_tags": query.activity_tags,
            "sort_by": query.sort_by,
            "include_unpublished": query.include_unpublished,
        });
        self.post_json::<AlbumPage>("getAlbumList", &body, CRUD_TIMEOUT)
            .await?
            .into_data()
    }

    async fn create(&self, draft: &AlbumDraft) -> CloudResult<String> {
        let body = serde_json::to_value(draft)
            .map_err(|e| CloudError::Decode(format!("unserializable album draft: {e}")))?;

        #[derive(serde::Deserialize)]
        struct Created {
            album_id: String,
        }

        let created: Created = self
            .post_json("createAlbum", &body, CRUD_TIMEOUT)
            .await?
            .into_data()?;
        tracing::info!(album_id = %created.album_id, "Album created");
        Ok(created.album_id)
    }

    async fn update(&self, album_id: &str, update: &AlbumUpdate) -> CloudResult<()> {
        let body = json!({
            "album_id": album_id,
            "updates": update,
        });
        self.post_json::<serde_json::Value>("updateAlbum", &body, CRUD_TIMEOUT)
            .await?
            .into_ok()
    }

    async fn delete(&self, album_id: &str) -> CloudResult<()> {
        let body = json!({ "album_id": album_id });
        self.post_json::<serde_json::Value>("deleteAlbum", &body, CRUD_TIMEOUT)
            .await?
            .into_ok()
    }
}

#[async_trait]
impl CategoryStore for CloudClient {
    async fn list(&self) -> CloudResult<Vec<CategoryConfig>> {
        self.post_json::<Vec<CategoryConfig>>("getCategoryConfig", &json!({}), CRUD_TIMEOUT)
            .await?
            .into_data()
    }

    async fn create(&self, draft: &CategoryDraft) -> CloudResult<String> {
        let body = serde_json::to_value(draft)
            .map_err(|e| CloudError::Decode(format!("unserializable category draft: {e}")))?;

        #[derive(serde::Deserialize)]
        struct Created {
            category_id: String,
        }

        let created: Created = self
            .post_json("createCategoryConfig", &body, CRUD_TIMEOUT)
            .await?
            .into_data()?;
        tracing::info!(category_id = %created.category_id, "Category created");
        Ok(created.category_id)
    }

    async fn update(&self, category_id: &str, update: &CategoryUpdate) -> CloudResult<()> {
        let body = json!({
            "category_id": category_id,
            "updates": update,
        });
        self.post_json::<serde_json::Value>("updateCategoryConfig", &body, CRUD_TIMEOUT)
            .await?
            .into_ok()
    }
}

#[async_trait]
impl FileStore for CloudClient {
    async fn upload_file(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        folder: &str,
    ) -> CloudResult<UploadedFile> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("fileName", file_name.to_string())
            .text("folder", folder.to_string());

        let response = self
            .client
            .post(format!("{}/uploadToCos", self.base_url))
            .timeout(UPLOAD_TIMEOUT)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let envelope: Envelope<UploadedFile> = serde_json::from_str(&text).map_err(|e| {
            CloudError::Decode(format!("uploadToCos returned unparseable body ({status}): {e}"))
        })?;
        envelope.into_data()
    }

    async fn upload_data_url(
        &self,
        data_url: &str,
        file_name: &str,
        folder: &str,
    ) -> CloudResult<UploadedFile> {
        // The function accepts a base64 data URL in place of a file part.
        let file = if data_url.starts_with("data:") {
            data_url.to_string()
        } else {
            format!("data:image/png;base64,{data_url}")
        };
        let body = json!({
            "file": file,
            "fileName": file_name,
            "folder": folder,
        });
        self.post_json::<UploadedFile>("uploadToCos", &body, UPLOAD_TIMEOUT)
            .await?
            .into_data()
    }
}

#[async_trait]
impl AnalyticsSource for CloudClient {
    async fn overview(&self, days: u32) -> CloudResult<UsageOverview> {
        let body = json!({ "days": days });
        self.post_json::<UsageOverview>("queryUsageOverview", &body, CRUD_TIMEOUT)
            .await?
            .into_data()
    }
}
