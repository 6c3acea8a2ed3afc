//! Request and response payloads for the cloud function endpoints.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Album listing
// ---------------------------------------------------------------------------

/// Sort order accepted by `getAlbumList`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlbumSort {
    #[default]
    Default,
    Likes,
    CreatedAt,
}

/// Query parameters for the album list call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlbumListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_styles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_tags: Option<Vec<String>>,
    #[serde(default)]
    pub sort_by: AlbumSort,
    /// Off by default: the list screen is the only caller that needs
    /// unpublished rows (for the publish toggle).
    #[serde(default)]
    pub include_unpublished: bool,
}

/// One page of albums.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumPage {
    pub albums: Vec<faceglow_core::album::AlbumRecord>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub has_more: bool,
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

/// Result of a successful object storage upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub url: String,
    #[serde(default, rename = "fileKey", skip_serializing_if = "Option::is_none")]
    pub file_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

/// One day of a counted metric.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: String,
    pub count: u64,
}

/// An aggregated error bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorCount {
    pub name: String,
    pub count: u64,
    #[serde(default)]
    pub last_seen: String,
}

/// Basic usage analytics for the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageOverview {
    pub page_views: u64,
    pub unique_visitors: u64,
    #[serde(default)]
    pub new_users: Vec<DailyCount>,
    #[serde(default)]
    pub top_errors: Vec<ErrorCount>,
}
