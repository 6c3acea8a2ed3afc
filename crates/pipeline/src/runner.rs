//! Stage execution for the batch creation wizard.
//!
//! Generation stages (prompts, covers, metadata) are fail-fast: the first
//! model error aborts the stage and the step does not advance. The commit
//! stage is the opposite: each album record is created independently and
//! failures are counted into the report instead of propagated.

use std::sync::Arc;

use chrono::Utc;
use faceglow_ai::{prompts, ChatModel, ImageModel};
use faceglow_cloud::{AlbumStore, FileStore};
use faceglow_core::album::{AlbumDraft, TaskConfig};
use faceglow_core::metadata::{parse_album_metadata, AlbumMetadata};
use serde::Serialize;

use crate::error::{PipelineError, PipelineResult};
use crate::state::{AlbumItem, ImageInput, WizardState, WizardStep};

/// Storage folder for wizard uploads.
const UPLOAD_FOLDER: &str = "albums";

/// Outcome of a commit: how many records were created, how many failed.
#[derive(Debug, Clone, Serialize)]
pub struct CommitReport {
    pub created: usize,
    pub failed: usize,
    pub album_ids: Vec<String>,
    pub src_image_url: String,
}

/// Runs wizard stages against the model endpoints and the album store.
#[derive(Clone)]
pub struct PipelineRunner {
    chat: Arc<dyn ChatModel>,
    image: Arc<dyn ImageModel>,
    files: Arc<dyn FileStore>,
    albums: Arc<dyn AlbumStore>,
}

impl PipelineRunner {
    pub fn new(
        chat: Arc<dyn ChatModel>,
        image: Arc<dyn ImageModel>,
        files: Arc<dyn FileStore>,
        albums: Arc<dyn AlbumStore>,
    ) -> Self {
        PipelineRunner {
            chat,
            image,
            files,
            albums,
        }
    }

    /// Runs the three generation stages back to back, leaving the session
    /// on the preview step.
    pub async fn run_generation(&self, state: &mut WizardState) -> PipelineResult<()> {
        self.generate_prompts(state).await?;
        self.generate_covers(state).await?;
        self.generate_metadata(state).await?;
        Ok(())
    }

    /// Stage 1: describe each target image against the source portrait,
    /// then rewrite the description into a generation-ready prompt.
    ///
    /// Items are built in a scratch vector so an error part way through
    /// discards the partial batch and leaves `state.items` untouched.
    pub async fn generate_prompts(&self, state: &mut WizardState) -> PipelineResult<()> {
        let (targets, src) = state.require_inputs()?;
        let src_url = src.data_url();
        let target_urls: Vec<String> = targets.iter().map(ImageInput::data_url).collect();

        state.set_step(WizardStep::GeneratePrompts);
        let mut items = Vec::with_capacity(target_urls.len());
        for (index, target_url) in target_urls.iter().enumerate() {
            let described = self
                .chat
                .complete(prompts::describe_request(target_url, &src_url))
                .await?;
            let structured = self.chat.complete(prompts::rewrite_request(&described)).await?;
            tracing::debug!(index, "prompt generated");
            items.push(AlbumItem::new(index, described, structured));
        }

        state.items = items;
        state.set_step(WizardStep::GenerateCovers);
        Ok(())
    }

    /// Stage 2: one cover image per item. Covers generated before an error
    /// stay in state so a retry only redoes the remainder.
    pub async fn generate_covers(&self, state: &mut WizardState) -> PipelineResult<()> {
        let (_, src) = state.require_inputs()?;
        let src_url = src.data_url();

        state.set_step(WizardStep::GenerateCovers);
        for index in 0..state.items.len() {
            let prompt = state.items[index].structured_prompt.clone();
            if prompt.is_empty() {
                tracing::warn!(index, "skipping cover for item without a prompt");
                continue;
            }
            let url = self.image.generate(&prompt, &src_url).await?;
            tracing::debug!(index, "cover generated");
            state.items[index].cover_url = Some(url);
        }

        state.set_step(WizardStep::GenerateMetadata);
        Ok(())
    }

    /// Stage 3: metadata for every item that has a prompt and a cover.
    /// Model calls can still fail, but a malformed response cannot: the
    /// parse chain always yields metadata.
    pub async fn generate_metadata(&self, state: &mut WizardState) -> PipelineResult<()> {
        state.set_step(WizardStep::GenerateMetadata);
        for item in &mut state.items {
            if item.structured_prompt.is_empty() || item.cover_url.is_none() {
                continue;
            }
            let response = self
                .chat
                .complete(prompts::metadata_request(
                    &item.structured_prompt,
                    Some(&item.generated_prompt),
                ))
                .await?;
            item.metadata = Some(parse_album_metadata(&response, &item.structured_prompt));
        }

        state.set_step(WizardStep::Preview);
        Ok(())
    }

    /// Regenerates the cover of a single item from the preview step.
    pub async fn regenerate_cover(
        &self,
        state: &mut WizardState,
        index: usize,
    ) -> PipelineResult<String> {
        let (_, src) = state.require_inputs()?;
        let src_url = src.data_url();
        let prompt = state.item(index)?.structured_prompt.clone();
        if prompt.is_empty() {
            return Err(PipelineError::Validation(format!(
                "Item {index} has no prompt to regenerate from"
            )));
        }

        let url = self.image.generate(&prompt, &src_url).await?;
        state.item_mut(index)?.cover_url = Some(url.clone());
        Ok(url)
    }

    /// Final stage, only reachable from the preview step: uploads the
    /// source image once, then creates one album record per item. Per-item
    /// failures are logged and counted, never propagated, so one bad record
    /// does not sink the batch.
    pub async fn commit(
        &self,
        state: &mut WizardState,
        default_function_type: &str,
    ) -> PipelineResult<CommitReport> {
        if state.step() != WizardStep::Preview {
            return Err(PipelineError::WrongStep {
                expected: WizardStep::Preview,
                actual: state.step(),
            });
        }
        let ready: Vec<usize> = state
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.metadata.is_some())
            .map(|(index, _)| index)
            .collect();
        if ready.is_empty() {
            return Err(PipelineError::Validation(
                "No album data has been generated yet".into(),
            ));
        }

        let (_, src) = state.require_inputs()?;
        let src_name = format!("src_{}.{}", Utc::now().timestamp_millis(), src.extension());
        let uploaded = self
            .files
            .upload_file(src.bytes.clone(), &src_name, UPLOAD_FOLDER)
            .await?;
        tracing::info!(url = %uploaded.url, "source image uploaded");

        let mut report = CommitReport {
            created: 0,
            failed: 0,
            album_ids: Vec::new(),
            src_image_url: uploaded.url.clone(),
        };
        for index in ready {
            match self
                .commit_item(state, index, &uploaded.url, default_function_type)
                .await
            {
                Ok(album_id) => {
                    report.created += 1;
                    report.album_ids.push(album_id);
                }
                Err(error) => {
                    tracing::warn!(index, %error, "album creation failed");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            created = report.created,
            failed = report.failed,
            "batch commit finished"
        );
        Ok(report)
    }

    async fn commit_item(
        &self,
        state: &WizardState,
        index: usize,
        src_image_url: &str,
        default_function_type: &str,
    ) -> PipelineResult<String> {
        let item = state.item(index)?;
        let metadata = item
            .metadata
            .as_ref()
            .ok_or_else(|| PipelineError::Validation(format!("Item {index} has no metadata")))?;

        let cover_url = match &item.cover_url {
            Some(url) => url.clone(),
            // No generated cover: fall back to uploading the target image
            // itself so the record still has one.
            None => {
                let target = state
                    .target_images
                    .get(item.target_index)
                    .ok_or(PipelineError::NoSuchItem(item.target_index))?;
                let name = format!(
                    "album_cover_{}_{}.{}",
                    Utc::now().timestamp_millis(),
                    index,
                    target.extension()
                );
                self.files
                    .upload_file(target.bytes.clone(), &name, UPLOAD_FOLDER)
                    .await?
                    .url
            }
        };

        let draft = build_draft(
            metadata,
            &item.settings,
            src_image_url,
            &cover_url,
            default_function_type,
        );
        draft.validate()?;
        let album_id = self.albums.create(&draft).await?;
        tracing::info!(index, %album_id, "album created");
        Ok(album_id)
    }
}

fn build_draft(
    metadata: &AlbumMetadata,
    settings: &crate::state::CommitSettings,
    src_image_url: &str,
    cover_url: &str,
    default_function_type: &str,
) -> AlbumDraft {
    AlbumDraft {
        album_name: metadata.album_name.clone(),
        album_description: metadata.album_description.clone(),
        album_image: cover_url.to_string(),
        theme_styles: metadata.theme_styles.clone(),
        function_type: settings
            .function_type
            .clone()
            .unwrap_or_else(|| default_function_type.to_string()),
        activity_tags: metadata.activity_tags.clone(),
        level: settings.level,
        price: settings.price,
        likes: 0,
        sort_weight: settings.sort_weight,
        published: false,
        task: TaskConfig::DoubaoImageToImage {
            src_image: Some(src_image_url.to_string()),
            result_image: Some(cover_url.to_string()),
            prompt_text: Some(metadata.prompt_text.clone()),
            style_description: Some(metadata.style_description.clone()),
            exclude_result_image: false,
        },
    }
}
