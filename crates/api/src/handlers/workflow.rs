//! Handlers for the batch creation wizard.
//!
//! A wizard session lives in memory (see [`crate::sessions::Sessions`]) and
//! is driven through: image uploads, a generate call that runs the prompt,
//! cover and metadata stages, preview edits, and a final commit that turns
//! every draft into an album record.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use faceglow_core::album::AlbumLevel;
use faceglow_core::category::{filter_sorted, CategoryKind};
use faceglow_pipeline::{AlbumItem, ImageInput, WizardState, WizardStep};
use faceglow_core::validation::non_blank;
use faceglow_core::CoreError;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Function type used at commit when no category is configured at all.
const FALLBACK_FUNCTION_TYPE: &str = "portrait";

/// Largest accepted upload, matching the admin UI's client-side limit.
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Serializable snapshot of a wizard session.
///
/// Image bytes are summarized as names; the admin UI previews uploads from
/// its own object URLs and never needs the bytes back.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub step: WizardStep,
    pub target_images: Vec<String>,
    pub src_image: Option<String>,
    pub items: Vec<AlbumItem>,
}

impl SessionView {
    fn of(session_id: Uuid, state: &WizardState) -> Self {
        SessionView {
            session_id,
            step: state.step(),
            target_images: state
                .target_images
                .iter()
                .map(|i| i.file_name.clone())
                .collect(),
            src_image: state.src_image.as_ref().map(|i| i.file_name.clone()),
            items: state.items.clone(),
        }
    }
}

async fn session_handle(
    state: &AppState,
    id: Uuid,
) -> AppResult<Arc<Mutex<WizardState>>> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Wizard session {id} not found")))
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

/// POST /api/v1/workflow/sessions
pub async fn create_session(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let session_id = state.sessions.create().await;

    tracing::info!(%session_id, "Wizard session created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SessionView {
                session_id,
                step: WizardStep::Input,
                target_images: Vec::new(),
                src_image: None,
                items: Vec::new(),
            },
        }),
    ))
}

/// GET /api/v1/workflow/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let handle = session_handle(&state, id).await?;
    let session = handle.lock().await;
    Ok(Json(DataResponse {
        data: SessionView::of(id, &session),
    }))
}

/// DELETE /api/v1/workflow/sessions/{id}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    if !state.sessions.remove(id).await {
        return Err(AppError::NotFound(format!("Wizard session {id} not found")));
    }

    tracing::info!(session_id = %id, "Wizard session discarded");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Image intake
// ---------------------------------------------------------------------------

/// POST /api/v1/workflow/sessions/{id}/images
///
/// Multipart upload with a `role` text field (`target` or `src`) and a
/// `file` field. Target uploads accumulate; a source upload replaces any
/// previous source image.
pub async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let handle = session_handle(&state, id).await?;

    let mut role: Option<String> = None;
    let mut image: Option<ImageInput> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        match field.name() {
            Some("role") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Unreadable role field: {e}")))?;
                role = Some(value);
            }
            Some("file") => {
                let file_name = field
                    .file_name()
                    .unwrap_or("upload.png")
                    .to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("image/png")
                    .to_string();
                if !content_type.starts_with("image/") {
                    return Err(AppError::BadRequest(format!(
                        "Unsupported content type {content_type}, expected an image"
                    )));
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Unreadable file field: {e}")))?;
                if bytes.len() > MAX_IMAGE_BYTES {
                    return Err(AppError::BadRequest(
                        "Image exceeds the 10 MB upload limit".into(),
                    ));
                }
                image = Some(ImageInput {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    let image = image.ok_or_else(|| AppError::BadRequest("Missing file field".into()))?;
    let role = role.ok_or_else(|| AppError::BadRequest("Missing role field".into()))?;

    let mut session = handle.lock().await;
    match role.as_str() {
        "target" => session.add_target_image(image),
        "src" => session.set_src_image(image),
        other => {
            return Err(AppError::BadRequest(format!(
                "Unknown role {other}, expected target or src"
            )))
        }
    }

    Ok(Json(DataResponse {
        data: SessionView::of(id, &session),
    }))
}

/// DELETE /api/v1/workflow/sessions/{id}/images/{index}
pub async fn remove_target_image(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> AppResult<impl IntoResponse> {
    let handle = session_handle(&state, id).await?;
    let mut session = handle.lock().await;
    session.remove_target_image(index)?;
    Ok(Json(DataResponse {
        data: SessionView::of(id, &session),
    }))
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// POST /api/v1/workflow/sessions/{id}/generate
///
/// Runs the prompt, cover and metadata stages back to back. Fail-fast: the
/// first model error aborts, the session stays on the failed stage, and
/// the client may retry with the surviving artifacts intact.
pub async fn generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let handle = session_handle(&state, id).await?;
    let mut session = handle.lock().await;

    state.runner.run_generation(&mut session).await?;

    tracing::info!(session_id = %id, items = session.items.len(), "Wizard generation finished");
    Ok(Json(DataResponse {
        data: SessionView::of(id, &session),
    }))
}

/// POST /api/v1/workflow/sessions/{id}/back
pub async fn step_back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let handle = session_handle(&state, id).await?;
    let mut session = handle.lock().await;
    session.back();
    Ok(Json(DataResponse {
        data: SessionView::of(id, &session),
    }))
}

// ---------------------------------------------------------------------------
// Preview edits
// ---------------------------------------------------------------------------

/// Editable fields of one wizard draft.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ItemEditRequest {
    #[validate(custom(function = non_blank, message = "is required"))]
    pub album_name: Option<String>,
    pub album_description: Option<String>,
    pub prompt_text: Option<String>,
    pub theme_styles: Option<Vec<String>>,
    pub activity_tags: Option<Vec<String>>,
    pub function_type: Option<String>,
    pub level: Option<AlbumLevel>,
    pub price: Option<f64>,
    pub sort_weight: Option<i64>,
}

/// PUT /api/v1/workflow/sessions/{id}/items/{index}
pub async fn edit_item(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(edit): Json<ItemEditRequest>,
) -> AppResult<impl IntoResponse> {
    edit.validate().map_err(CoreError::from)?;
    let handle = session_handle(&state, id).await?;
    let mut session = handle.lock().await;

    let item = session.item_mut(index)?;
    let metadata = item.metadata.as_mut().ok_or_else(|| {
        AppError::BadRequest(format!("Item {index} has no generated draft to edit"))
    })?;

    if let Some(name) = edit.album_name {
        metadata.album_name = name;
    }
    if let Some(description) = edit.album_description {
        metadata.album_description = description;
    }
    if let Some(prompt) = edit.prompt_text {
        metadata.prompt_text = prompt;
    }
    if let Some(styles) = edit.theme_styles {
        metadata.theme_styles = styles;
    }
    if let Some(tags) = edit.activity_tags {
        metadata.activity_tags = tags;
    }
    if let Some(function_type) = edit.function_type {
        item.settings.function_type = Some(function_type);
    }
    if let Some(level) = edit.level {
        item.settings.level = level;
    }
    if let Some(price) = edit.price {
        item.settings.price = price;
    }
    if let Some(sort_weight) = edit.sort_weight {
        item.settings.sort_weight = sort_weight;
    }

    Ok(Json(DataResponse {
        data: SessionView::of(id, &session),
    }))
}

#[derive(Debug, Serialize)]
pub struct RegeneratedCover {
    pub index: usize,
    pub cover_url: String,
}

/// POST /api/v1/workflow/sessions/{id}/items/{index}/cover
pub async fn regenerate_cover(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> AppResult<impl IntoResponse> {
    let handle = session_handle(&state, id).await?;
    let mut session = handle.lock().await;

    let cover_url = state.runner.regenerate_cover(&mut session, index).await?;

    tracing::info!(session_id = %id, index, "Cover regenerated");
    Ok(Json(DataResponse {
        data: RegeneratedCover { index, cover_url },
    }))
}

// ---------------------------------------------------------------------------
// Commit
// ---------------------------------------------------------------------------

/// POST /api/v1/workflow/sessions/{id}/commit
///
/// Creates one album record per draft and resets the session on success.
/// Drafts without an explicit function type fall back to the first active
/// function-type category, then to a fixed default.
pub async fn commit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let handle = session_handle(&state, id).await?;
    let mut session = handle.lock().await;

    let default_function_type = match state.categories.list().await {
        Ok(all) => filter_sorted(&all, CategoryKind::FunctionType, true)
            .first()
            .map(|c| c.category_code.clone())
            .unwrap_or_else(|| FALLBACK_FUNCTION_TYPE.to_string()),
        Err(error) => {
            tracing::warn!(%error, "Category lookup failed, using fallback function type");
            FALLBACK_FUNCTION_TYPE.to_string()
        }
    };

    let report = state
        .runner
        .commit(&mut session, &default_function_type)
        .await?;

    tracing::info!(
        session_id = %id,
        created = report.created,
        failed = report.failed,
        "Wizard commit finished"
    );

    // The commit ends the flow either way; re-running it would duplicate
    // the records that did succeed. The report carries the failure count.
    session.reset();

    Ok(Json(DataResponse { data: report }))
}
