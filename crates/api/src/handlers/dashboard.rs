//! Handlers for the analytics dashboard.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use faceglow_cloud::types::UsageOverview;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OverviewParams {
    #[serde(default = "default_days")]
    pub days: u32,
}

fn default_days() -> u32 {
    7
}

/// GET /api/v1/dashboard/overview
///
/// Aggregated usage over the last `days` days. Analytics is best-effort:
/// an upstream failure degrades to zeroed counters instead of erroring,
/// so a broken stats function never blanks the whole dashboard.
pub async fn usage_overview(
    State(state): State<AppState>,
    Query(params): Query<OverviewParams>,
) -> AppResult<impl IntoResponse> {
    let data = match state.analytics.overview(params.days).await {
        Ok(overview) => overview,
        Err(error) => {
            tracing::warn!(%error, days = params.days, "Usage overview unavailable, serving zeros");
            UsageOverview::default()
        }
    };

    Ok(Json(DataResponse { data }))
}
