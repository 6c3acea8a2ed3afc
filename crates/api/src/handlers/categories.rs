//! Handlers for category taxonomy management.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use faceglow_cloud::traits::CategoryUpdate;
use faceglow_core::category::{filter_sorted, CategoryDraft, CategoryKind, ExtraConfig};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListCategoriesParams {
    /// Restrict to one taxonomy kind; omitted means all kinds.
    pub kind: Option<CategoryKind>,
    /// Only entries offered for new selections.
    #[serde(default)]
    pub active_only: bool,
}

/// GET /api/v1/categories
///
/// Category entries, sorted by `sort_order` within each kind.
pub async fn list_categories(
    State(state): State<AppState>,
    Query(params): Query<ListCategoriesParams>,
) -> AppResult<impl IntoResponse> {
    let all = state.categories.list().await?;

    let data = match params.kind {
        Some(kind) => filter_sorted(&all, kind, params.active_only),
        None => {
            let mut selected = all;
            if params.active_only {
                selected.retain(|c| c.is_active);
            }
            selected.sort_by_key(|c| c.sort_order);
            selected
        }
    };

    Ok(Json(DataResponse { data }))
}

#[derive(Debug, Serialize)]
pub struct CreatedCategory {
    pub category_id: String,
}

/// POST /api/v1/categories
pub async fn create_category(
    State(state): State<AppState>,
    Json(draft): Json<CategoryDraft>,
) -> AppResult<impl IntoResponse> {
    draft.validate()?;
    let category_id = state.categories.create(&draft).await?;

    tracing::info!(%category_id, code = %draft.category_code, "Category created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedCategory { category_id },
        }),
    ))
}

/// PUT /api/v1/categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    Json(update): Json<CategoryUpdate>,
) -> AppResult<impl IntoResponse> {
    state.categories.update(&category_id, &update).await?;

    tracing::info!(%category_id, "Category updated");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
    /// Optional extra-config overrides applied together with the toggle.
    #[serde(default)]
    pub extra_config: Option<ExtraConfig>,
}

/// PATCH /api/v1/categories/{id}/active
///
/// Toggles the active flag. When extra-config overrides are supplied they
/// are merged field-wise into the stored config so the toggle can never
/// wipe a function type's `supported_theme_styles`.
pub async fn set_active(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    Json(input): Json<SetActiveRequest>,
) -> AppResult<impl IntoResponse> {
    let extra_config = match input.extra_config {
        None => None,
        Some(overrides) => {
            let all = state.categories.list().await?;
            let existing = all
                .iter()
                .find(|c| c.category_id == category_id)
                .ok_or_else(|| AppError::NotFound(format!("Category {category_id} not found")))?;
            let base = existing.extra_config.clone().unwrap_or_default();
            Some(base.merged_with(&overrides))
        }
    };

    let update = CategoryUpdate {
        is_active: Some(input.is_active),
        extra_config,
        ..Default::default()
    };
    state.categories.update(&category_id, &update).await?;

    tracing::info!(%category_id, is_active = input.is_active, "Category active flag updated");
    Ok(StatusCode::NO_CONTENT)
}
