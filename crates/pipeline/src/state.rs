//! Wizard session state.
//!
//! The state machine is pure: transitions validate their preconditions and
//! never touch the network. The [`runner`](crate::runner) performs the model
//! and upload calls and advances the step on success.

use faceglow_ai::encode_data_url;
use faceglow_core::album::AlbumLevel;
use faceglow_core::metadata::AlbumMetadata;
use serde::Serialize;

use crate::error::{PipelineError, PipelineResult};

/// Steps of the batch creation wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Input,
    GeneratePrompts,
    GenerateCovers,
    GenerateMetadata,
    Preview,
}

impl WizardStep {
    /// The step a "back" action returns to. `Input` is a floor.
    pub fn previous(self) -> WizardStep {
        match self {
            WizardStep::Input => WizardStep::Input,
            WizardStep::GeneratePrompts => WizardStep::Input,
            WizardStep::GenerateCovers => WizardStep::GeneratePrompts,
            WizardStep::GenerateMetadata => WizardStep::GenerateCovers,
            WizardStep::Preview => WizardStep::GenerateMetadata,
        }
    }
}

/// An uploaded image held in memory for the duration of a wizard session.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageInput {
    pub fn data_url(&self) -> String {
        encode_data_url(&self.bytes, &self.content_type)
    }

    /// File extension taken from the original name, defaulting to `png`.
    pub fn extension(&self) -> &str {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
            .unwrap_or("png")
    }
}

/// Per-item commit settings editable on the preview step.
#[derive(Debug, Clone, Serialize)]
pub struct CommitSettings {
    /// Category id the album is filed under. `None` falls back to the
    /// caller-supplied default at commit time.
    pub function_type: Option<String>,
    pub level: AlbumLevel,
    pub price: f64,
    pub sort_weight: i64,
}

impl Default for CommitSettings {
    fn default() -> Self {
        CommitSettings {
            function_type: None,
            level: AlbumLevel::Free,
            price: 0.0,
            sort_weight: 0,
        }
    }
}

/// One album-in-progress, tied to a target image by index.
#[derive(Debug, Clone, Serialize)]
pub struct AlbumItem {
    pub target_index: usize,
    /// Free-form scene description from the vision model.
    pub generated_prompt: String,
    /// Rewritten, generation-ready prompt.
    pub structured_prompt: String,
    pub cover_url: Option<String>,
    pub metadata: Option<AlbumMetadata>,
    pub settings: CommitSettings,
}

impl AlbumItem {
    pub fn new(target_index: usize, generated_prompt: String, structured_prompt: String) -> Self {
        AlbumItem {
            target_index,
            generated_prompt,
            structured_prompt,
            cover_url: None,
            metadata: None,
            settings: CommitSettings::default(),
        }
    }
}

/// Full state of one wizard session.
#[derive(Debug)]
pub struct WizardState {
    step: WizardStep,
    pub target_images: Vec<ImageInput>,
    pub src_image: Option<ImageInput>,
    pub items: Vec<AlbumItem>,
}

impl Default for WizardState {
    fn default() -> Self {
        WizardState::new()
    }
}

impl WizardState {
    pub fn new() -> Self {
        WizardState {
            step: WizardStep::Input,
            target_images: Vec::new(),
            src_image: None,
            items: Vec::new(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub(crate) fn set_step(&mut self, step: WizardStep) {
        self.step = step;
    }

    pub fn add_target_image(&mut self, image: ImageInput) {
        self.target_images.push(image);
    }

    pub fn remove_target_image(&mut self, index: usize) -> PipelineResult<()> {
        if index >= self.target_images.len() {
            return Err(PipelineError::NoSuchItem(index));
        }
        self.target_images.remove(index);
        Ok(())
    }

    /// Replaces the source image; the wizard keeps at most one.
    pub fn set_src_image(&mut self, image: ImageInput) {
        self.src_image = Some(image);
    }

    /// Precondition for starting generation: at least one target image and
    /// exactly one source image.
    pub fn require_inputs(&self) -> PipelineResult<(&[ImageInput], &ImageInput)> {
        if self.target_images.is_empty() {
            return Err(PipelineError::Validation(
                "Please upload at least one target image".into(),
            ));
        }
        let src = self.src_image.as_ref().ok_or_else(|| {
            PipelineError::Validation("Please upload a source portrait image".into())
        })?;
        Ok((&self.target_images, src))
    }

    pub fn item(&self, index: usize) -> PipelineResult<&AlbumItem> {
        self.items.get(index).ok_or(PipelineError::NoSuchItem(index))
    }

    pub fn item_mut(&mut self, index: usize) -> PipelineResult<&mut AlbumItem> {
        self.items
            .get_mut(index)
            .ok_or(PipelineError::NoSuchItem(index))
    }

    /// Steps back one stage. Already-generated artifacts are kept so a
    /// re-run can overwrite them.
    pub fn back(&mut self) {
        self.set_step(self.step().previous());
    }

    /// Clears everything back to a fresh session.
    pub fn reset(&mut self) {
        *self = WizardState::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn png(name: &str) -> ImageInput {
        ImageInput {
            file_name: name.to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    #[test]
    fn new_session_starts_at_input() {
        let state = WizardState::new();
        assert_eq!(state.step(), WizardStep::Input);
        assert!(state.target_images.is_empty());
        assert!(state.src_image.is_none());
    }

    #[test]
    fn require_inputs_rejects_missing_targets() {
        let mut state = WizardState::new();
        assert_matches!(state.require_inputs(), Err(PipelineError::Validation(_)));

        state.add_target_image(png("a.png"));
        assert_matches!(state.require_inputs(), Err(PipelineError::Validation(_)));

        state.set_src_image(png("src.png"));
        assert!(state.require_inputs().is_ok());
    }

    #[test]
    fn src_image_is_replaced_not_appended() {
        let mut state = WizardState::new();
        state.set_src_image(png("first.png"));
        state.set_src_image(png("second.png"));
        assert_eq!(state.src_image.as_ref().map(|i| i.file_name.as_str()), Some("second.png"));
    }

    #[test]
    fn back_walks_one_step_and_floors_at_input() {
        let mut state = WizardState::new();
        state.set_step(WizardStep::Preview);
        state.back();
        assert_eq!(state.step(), WizardStep::GenerateMetadata);
        state.back();
        assert_eq!(state.step(), WizardStep::GenerateCovers);
        state.set_step(WizardStep::Input);
        state.back();
        assert_eq!(state.step(), WizardStep::Input);
    }

    #[test]
    fn back_keeps_generated_items() {
        let mut state = WizardState::new();
        state.items.push(AlbumItem::new(0, "desc".into(), "prompt".into()));
        state.set_step(WizardStep::GenerateCovers);
        state.back();
        assert_eq!(state.items.len(), 1);
    }

    #[test]
    fn extension_falls_back_to_png() {
        assert_eq!(png("photo.jpeg").extension(), "jpeg");
        assert_eq!(png("photo").extension(), "png");
        assert_eq!(png("photo.").extension(), "png");
    }

    #[test]
    fn remove_target_image_bounds_checked() {
        let mut state = WizardState::new();
        state.add_target_image(png("a.png"));
        assert_matches!(state.remove_target_image(5), Err(PipelineError::NoSuchItem(5)));
        assert!(state.remove_target_image(0).is_ok());
        assert!(state.target_images.is_empty());
    }

    #[test]
    fn reset_clears_everything() {
        let mut state = WizardState::new();
        state.add_target_image(png("a.png"));
        state.set_src_image(png("src.png"));
        state.items.push(AlbumItem::new(0, "d".into(), "p".into()));
        state.set_step(WizardStep::Preview);
        state.reset();
        assert_eq!(state.step(), WizardStep::Input);
        assert!(state.target_images.is_empty());
        assert!(state.src_image.is_none());
        assert!(state.items.is_empty());
    }
}
