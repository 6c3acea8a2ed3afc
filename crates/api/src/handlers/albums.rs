//! Handlers for album template management.

use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use faceglow_cloud::types::{AlbumListQuery, AlbumSort};
use faceglow_cloud::FileStore;
use faceglow_core::album::{AlbumDraft, AlbumLevel, AlbumUpdate, TaskConfig};
use faceglow_core::validation::non_blank;
use faceglow_core::CoreError;
use faceglow_pipeline::ImageInput;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Destination folder for files uploaded through the batch form.
const UPLOAD_FOLDER: &str = "albums";

/// Largest accepted image upload, matching the admin UI's client-side limit.
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Preview videos and audio tracks get a larger allowance.
const MAX_MEDIA_BYTES: usize = 100 * 1024 * 1024;

/// Query parameters for the album list.
///
/// The multi-value filters arrive as comma-separated strings
/// (`?theme_styles=winter,couples`) since the admin UI builds flat query
/// strings.
#[derive(Debug, Default, Deserialize)]
pub struct ListAlbumsParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub function_types: Option<String>,
    pub theme_styles: Option<String>,
    pub activity_tags: Option<String>,
    #[serde(default)]
    pub sort_by: AlbumSort,
    #[serde(default)]
    pub include_unpublished: bool,
}

fn split_codes(raw: &Option<String>) -> Option<Vec<String>> {
    raw.as_ref().map(|s| {
        s.split(',')
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty())
            .collect()
    })
}

impl ListAlbumsParams {
    fn into_query(self) -> AlbumListQuery {
        AlbumListQuery {
            page: self.page,
            page_size: self.page_size,
            function_types: split_codes(&self.function_types),
            theme_styles: split_codes(&self.theme_styles),
            activity_tags: split_codes(&self.activity_tags),
            sort_by: self.sort_by,
            include_unpublished: self.include_unpublished,
        }
    }
}

/// GET /api/v1/albums
///
/// Paginated album list with optional category filters.
pub async fn list_albums(
    State(state): State<AppState>,
    Query(params): Query<ListAlbumsParams>,
) -> AppResult<impl IntoResponse> {
    let page = state.albums.list(&params.into_query()).await?;
    Ok(Json(DataResponse { data: page }))
}

/// Id payload returned by create endpoints.
#[derive(Debug, Serialize)]
pub struct CreatedAlbum {
    pub album_id: String,
}

/// POST /api/v1/albums
pub async fn create_album(
    State(state): State<AppState>,
    Json(draft): Json<AlbumDraft>,
) -> AppResult<impl IntoResponse> {
    draft.validate()?;
    let album_id = state.albums.create(&draft).await?;

    tracing::info!(%album_id, name = %draft.album_name, "Album created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedAlbum { album_id },
        }),
    ))
}

/// PUT /api/v1/albums/{id}
pub async fn update_album(
    State(state): State<AppState>,
    Path(album_id): Path<String>,
    Json(update): Json<AlbumUpdate>,
) -> AppResult<impl IntoResponse> {
    if update.is_empty() {
        return Err(AppError::BadRequest("Update contains no fields".into()));
    }
    update.validate()?;
    state.albums.update(&album_id, &update).await?;

    tracing::info!(%album_id, "Album updated");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/albums/{id}
pub async fn delete_album(
    State(state): State<AppState>,
    Path(album_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.albums.delete(&album_id).await?;

    tracing::info!(%album_id, "Album deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct SetWeightRequest {
    pub sort_weight: i64,
}

/// PATCH /api/v1/albums/{id}/weight
///
/// Inline sort-weight edit from the list screen. Goes through the same
/// partial-update path as the full edit form.
pub async fn set_sort_weight(
    State(state): State<AppState>,
    Path(album_id): Path<String>,
    Json(input): Json<SetWeightRequest>,
) -> AppResult<impl IntoResponse> {
    let update = AlbumUpdate {
        sort_weight: Some(input.sort_weight),
        ..Default::default()
    };
    state.albums.update(&album_id, &update).await?;

    tracing::info!(%album_id, sort_weight = input.sort_weight, "Album sort weight updated");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct SetPublishedRequest {
    pub published: bool,
}

/// PATCH /api/v1/albums/{id}/published
pub async fn set_published(
    State(state): State<AppState>,
    Path(album_id): Path<String>,
    Json(input): Json<SetPublishedRequest>,
) -> AppResult<impl IntoResponse> {
    let update = AlbumUpdate {
        published: Some(input.published),
        ..Default::default()
    };
    state.albums.update(&album_id, &update).await?;

    tracing::info!(%album_id, published = input.published, "Album publish state updated");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Batch creation form
// ---------------------------------------------------------------------------

/// Form fields of the batch creation screen, sent as a JSON `record` part
/// alongside the file parts.
#[derive(Debug, Deserialize, Validate)]
pub struct BatchCreateRequest {
    #[validate(custom(function = non_blank, message = "is required"))]
    pub album_name: String,
    #[validate(custom(function = non_blank, message = "is required"))]
    pub album_description: String,
    pub task_execution_type: String,
    #[validate(custom(function = non_blank, message = "is required"))]
    pub function_type: String,
    #[serde(default)]
    pub prompt_text: Option<String>,
    #[serde(default)]
    pub style_description: Option<String>,
    #[serde(default)]
    pub video_effect_template: Option<String>,
    #[serde(default)]
    pub style_index: Option<i64>,
    #[serde(default)]
    pub exclude_result_image: bool,
    #[serde(default)]
    pub theme_styles: Vec<String>,
    #[serde(default)]
    pub activity_tags: Vec<String>,
    #[serde(default)]
    pub level: AlbumLevel,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub price: f64,
    #[serde(default)]
    pub sort_weight: i64,
    #[serde(default)]
    pub published: bool,
}

/// File parts collected from the batch form multipart body. Which parts are
/// required depends on the execution type.
#[derive(Debug, Default)]
struct BatchUploads {
    cover: Option<ImageInput>,
    src_image: Option<ImageInput>,
    result_image: Option<ImageInput>,
    preview_video: Option<ImageInput>,
    style_ref: Option<ImageInput>,
    audio: Option<ImageInput>,
}

impl BatchUploads {
    /// File names standing in for the eventual URLs, so the draft can be
    /// validated before anything is uploaded.
    fn placeholder_urls(&self) -> FileUrls {
        let name = |file: &Option<ImageInput>| file.as_ref().map(|f| f.file_name.clone());
        FileUrls {
            cover: name(&self.cover),
            src_image: name(&self.src_image),
            result_image: name(&self.result_image),
            preview_video: name(&self.preview_video),
            style_ref: name(&self.style_ref),
            audio: name(&self.audio),
        }
    }
}

/// Storage URLs for the batch form's file parts, once uploaded.
#[derive(Debug, Default)]
struct FileUrls {
    cover: Option<String>,
    src_image: Option<String>,
    result_image: Option<String>,
    preview_video: Option<String>,
    style_ref: Option<String>,
    audio: Option<String>,
}

async fn read_file_part(
    field: Field<'_>,
    expected_type: &str,
    limit: usize,
) -> AppResult<ImageInput> {
    let file_name = field.file_name().unwrap_or("upload.bin").to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    if !content_type.starts_with(expected_type) {
        return Err(AppError::BadRequest(format!(
            "Unsupported content type {content_type}, expected {expected_type}*"
        )));
    }
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Unreadable file field: {e}")))?;
    if bytes.len() > limit {
        return Err(AppError::BadRequest(format!(
            "File exceeds the {} MB upload limit",
            limit / (1024 * 1024)
        )));
    }
    Ok(ImageInput {
        file_name,
        content_type,
        bytes: bytes.to_vec(),
    })
}

fn build_task(request: &BatchCreateRequest, urls: &FileUrls) -> AppResult<TaskConfig> {
    let task = match request.task_execution_type.as_str() {
        "async_doubao_image_to_image" => TaskConfig::DoubaoImageToImage {
            src_image: urls.src_image.clone(),
            result_image: urls.result_image.clone(),
            prompt_text: request.prompt_text.clone(),
            style_description: request.style_description.clone(),
            exclude_result_image: request.exclude_result_image,
        },
        "async_image_to_image" => TaskConfig::ImageToImage {
            src_image: urls.src_image.clone(),
            result_image: urls.result_image.clone(),
            prompt_text: request.prompt_text.clone(),
            style_description: request.style_description.clone(),
        },
        "async_image_to_video" => TaskConfig::ImageToVideo {
            src_image: urls.src_image.clone(),
            preview_video_url: urls.preview_video.clone(),
            prompt_text: request.prompt_text.clone(),
            audio_url: urls.audio.clone(),
        },
        "async_video_effect" => TaskConfig::VideoEffect {
            video_effect_template: request.video_effect_template.clone(),
            src_image: urls.src_image.clone(),
            preview_video_url: urls.preview_video.clone(),
        },
        "async_portrait_style_redraw" => TaskConfig::PortraitStyleRedraw {
            style_index: request.style_index,
            style_ref_url: urls.style_ref.clone(),
            src_image: urls.src_image.clone(),
            result_image: urls.result_image.clone(),
            prompt_text: request.prompt_text.clone(),
        },
        other => {
            return Err(AppError::BadRequest(format!(
                "Unknown task_execution_type {other}"
            )))
        }
    };
    Ok(task)
}

fn build_batch_draft(request: &BatchCreateRequest, urls: &FileUrls) -> AppResult<AlbumDraft> {
    let task = build_task(request, urls)?;
    // Video execution types use the preview video as the list cover when no
    // dedicated cover image was uploaded.
    let album_image = urls
        .cover
        .clone()
        .or_else(|| {
            if task.is_video() {
                urls.preview_video.clone()
            } else {
                None
            }
        })
        .unwrap_or_default();

    Ok(AlbumDraft {
        album_name: request.album_name.clone(),
        album_description: request.album_description.clone(),
        album_image,
        theme_styles: request.theme_styles.clone(),
        function_type: request.function_type.clone(),
        activity_tags: request.activity_tags.clone(),
        level: request.level,
        price: request.price,
        likes: 0,
        sort_weight: request.sort_weight,
        published: request.published,
        task,
    })
}

async fn upload_batch_file(
    state: &AppState,
    file: &Option<ImageInput>,
    label: &str,
    stamp: i64,
) -> AppResult<Option<String>> {
    let Some(file) = file else { return Ok(None) };
    let file_name = format!("batch_{label}_{stamp}.{}", file.extension());
    let uploaded = state
        .files
        .upload_file(file.bytes.clone(), &file_name, UPLOAD_FOLDER)
        .await?;
    Ok(Some(uploaded.url))
}

/// POST /api/v1/albums/batch
///
/// Creates one album from the batch form: a JSON `record` part plus file
/// parts (`cover`, `src_image`, `result_image`, `preview_video`,
/// `style_ref`, `audio`). The assembled record is validated in full before
/// the first upload, so a rejected form costs no storage writes.
pub async fn batch_create_album(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut request: Option<BatchCreateRequest> = None;
    let mut uploads = BatchUploads::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "record" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Unreadable record field: {e}")))?;
                request = Some(serde_json::from_str(&text).map_err(|e| {
                    AppError::BadRequest(format!("Malformed record field: {e}"))
                })?);
            }
            "cover" => uploads.cover = Some(read_file_part(field, "image/", MAX_IMAGE_BYTES).await?),
            "src_image" => {
                uploads.src_image = Some(read_file_part(field, "image/", MAX_IMAGE_BYTES).await?)
            }
            "result_image" => {
                uploads.result_image = Some(read_file_part(field, "image/", MAX_IMAGE_BYTES).await?)
            }
            "style_ref" => {
                uploads.style_ref = Some(read_file_part(field, "image/", MAX_IMAGE_BYTES).await?)
            }
            "preview_video" => {
                uploads.preview_video =
                    Some(read_file_part(field, "video/", MAX_MEDIA_BYTES).await?)
            }
            "audio" => uploads.audio = Some(read_file_part(field, "audio/", MAX_MEDIA_BYTES).await?),
            _ => {}
        }
    }

    let request = request.ok_or_else(|| AppError::BadRequest("Missing record field".into()))?;
    request.validate().map_err(CoreError::from)?;

    // Dry run with file names in place of URLs. A missing required file or
    // blank form field fails here, before any upload happens.
    build_batch_draft(&request, &uploads.placeholder_urls())?.validate()?;

    let stamp = chrono::Utc::now().timestamp_millis();
    let urls = FileUrls {
        cover: upload_batch_file(&state, &uploads.cover, "cover", stamp).await?,
        src_image: upload_batch_file(&state, &uploads.src_image, "src", stamp).await?,
        result_image: upload_batch_file(&state, &uploads.result_image, "result", stamp).await?,
        preview_video: upload_batch_file(&state, &uploads.preview_video, "preview", stamp).await?,
        style_ref: upload_batch_file(&state, &uploads.style_ref, "style", stamp).await?,
        audio: upload_batch_file(&state, &uploads.audio, "audio", stamp).await?,
    };

    let draft = build_batch_draft(&request, &urls)?;
    draft.validate()?;
    let album_id = state.albums.create(&draft).await?;

    tracing::info!(%album_id, task = draft.task.kind(), "Album created from batch form");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedAlbum { album_id },
        }),
    ))
}
