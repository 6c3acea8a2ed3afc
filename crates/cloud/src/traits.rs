//! Seam traits over the cloud function endpoints.
//!
//! The HTTP API and the wizard pipeline depend on these traits rather than
//! on [`crate::CloudClient`] directly, so tests can substitute in-memory
//! fakes without a network.

use async_trait::async_trait;

use faceglow_core::album::{AlbumDraft, AlbumUpdate};
use faceglow_core::category::{CategoryConfig, CategoryDraft, ExtraConfig};

use crate::error::CloudResult;
use crate::types::{AlbumListQuery, AlbumPage, UploadedFile, UsageOverview};

/// Album persistence, owned by the cloud functions.
#[async_trait]
pub trait AlbumStore: Send + Sync {
    async fn list(&self, query: &AlbumListQuery) -> CloudResult<AlbumPage>;

    /// Create a record, returning the new `album_id`.
    async fn create(&self, draft: &AlbumDraft) -> CloudResult<String>;

    async fn update(&self, album_id: &str, update: &AlbumUpdate) -> CloudResult<()>;

    async fn delete(&self, album_id: &str) -> CloudResult<()>;
}

/// Category configuration persistence.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list(&self) -> CloudResult<Vec<CategoryConfig>>;

    /// Create a record, returning the new `category_id`.
    async fn create(&self, draft: &CategoryDraft) -> CloudResult<String>;

    async fn update(&self, category_id: &str, update: &CategoryUpdate) -> CloudResult<()>;
}

/// Partial category update.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CategoryUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_label_zh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_config: Option<ExtraConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Object storage uploads, proxied through a cloud function so storage
/// credentials never reach this service's callers.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Multipart upload of raw file bytes.
    async fn upload_file(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        folder: &str,
    ) -> CloudResult<UploadedFile>;

    /// JSON upload of an already base64-encoded data URL, used for
    /// synthetically generated images.
    async fn upload_data_url(
        &self,
        data_url: &str,
        file_name: &str,
        folder: &str,
    ) -> CloudResult<UploadedFile>;
}

/// Usage analytics for the dashboard.
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    /// Aggregated usage over the last `days` days.
    async fn overview(&self, days: u32) -> CloudResult<UsageOverview>;
}
