use std::sync::Arc;

use faceglow_cloud::{AlbumStore, AnalyticsSource, CategoryStore, FileStore};
use faceglow_pipeline::runner::PipelineRunner;

use crate::config::ServerConfig;
use crate::sessions::Sessions;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). The stores are
/// trait objects so integration tests can swap in in-memory fakes.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Album persistence (cloud function backed in production).
    pub albums: Arc<dyn AlbumStore>,
    /// Category persistence.
    pub categories: Arc<dyn CategoryStore>,
    /// Object storage uploads.
    pub files: Arc<dyn FileStore>,
    /// Usage analytics for the dashboard.
    pub analytics: Arc<dyn AnalyticsSource>,
    /// Wizard stage executor.
    pub runner: PipelineRunner,
    /// Live wizard sessions.
    pub sessions: Arc<Sessions>,
}
