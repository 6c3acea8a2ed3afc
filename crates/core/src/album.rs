//! Album records and their per-variant validation.
//!
//! An album is a generation template shown to end users of the mobile app.
//! Which fields are meaningful on a record is decided entirely by its
//! `task_execution_type`, so the task-specific fields are modelled as a
//! tagged union ([`TaskConfig`]) flattened into the record. Serializing a
//! record can therefore never emit fields belonging to a foreign variant,
//! and validation is per variant.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::error::CoreError;
use crate::validation::non_blank;

// ---------------------------------------------------------------------------
// Album level
// ---------------------------------------------------------------------------

/// Pricing tier of an album. Stored as a string code upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlbumLevel {
    #[default]
    #[serde(rename = "0")]
    Free,
    #[serde(rename = "1")]
    Premium,
    #[serde(rename = "2")]
    Vip,
}

// ---------------------------------------------------------------------------
// Task execution config (tagged union)
// ---------------------------------------------------------------------------

/// Task-specific album fields, keyed by the `task_execution_type`
/// discriminator on the wire.
///
/// The sync variants carry no dedicated fields (they are driven by the
/// record's `template_list`); [`TaskConfig::Unknown`] absorbs discriminators
/// this version does not know so that listing never fails on legacy rows,
/// while [`TaskConfig::validate`] rejects them on any write path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "task_execution_type")]
pub enum TaskConfig {
    /// Asynchronous image-to-image via the Doubao endpoint.
    #[serde(rename = "async_doubao_image_to_image")]
    DoubaoImageToImage {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src_image: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result_image: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prompt_text: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style_description: Option<String>,
        /// When set, the mobile client omits `result_image` from the model
        /// call. Defaults to false for compatibility with older records.
        #[serde(default)]
        exclude_result_image: bool,
    },

    #[serde(rename = "async_image_to_image")]
    ImageToImage {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src_image: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result_image: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prompt_text: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style_description: Option<String>,
    },

    #[serde(rename = "async_image_to_video")]
    ImageToVideo {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src_image: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        preview_video_url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prompt_text: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        audio_url: Option<String>,
    },

    /// Video effect templates carry no prompt at all; the effect template
    /// name selects the upstream pipeline behaviour.
    #[serde(rename = "async_video_effect")]
    VideoEffect {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        video_effect_template: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src_image: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        preview_video_url: Option<String>,
    },

    #[serde(rename = "async_portrait_style_redraw")]
    PortraitStyleRedraw {
        /// 0..=9 select preset styles; -1 selects a custom style, which
        /// then requires `style_ref_url`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style_index: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        style_ref_url: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src_image: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result_image: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prompt_text: Option<String>,
    },

    #[serde(rename = "sync_portrait")]
    SyncPortrait,

    #[serde(rename = "sync_group_photo")]
    SyncGroupPhoto,

    #[serde(other)]
    Unknown,
}

impl TaskConfig {
    /// The wire value of the `task_execution_type` discriminator.
    pub fn kind(&self) -> &'static str {
        match self {
            TaskConfig::DoubaoImageToImage { .. } => "async_doubao_image_to_image",
            TaskConfig::ImageToImage { .. } => "async_image_to_image",
            TaskConfig::ImageToVideo { .. } => "async_image_to_video",
            TaskConfig::VideoEffect { .. } => "async_video_effect",
            TaskConfig::PortraitStyleRedraw { .. } => "async_portrait_style_redraw",
            TaskConfig::SyncPortrait => "sync_portrait",
            TaskConfig::SyncGroupPhoto => "sync_group_photo",
            TaskConfig::Unknown => "unknown",
        }
    }

    /// Enforce the required field set of this variant.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            TaskConfig::DoubaoImageToImage {
                src_image,
                prompt_text,
                ..
            } => {
                require(src_image, "src_image")?;
                require(prompt_text, "prompt_text")
            }
            TaskConfig::ImageToImage {
                src_image,
                result_image,
                prompt_text,
                ..
            } => {
                require(src_image, "src_image")?;
                require(result_image, "result_image")?;
                require(prompt_text, "prompt_text")
            }
            TaskConfig::ImageToVideo {
                src_image,
                preview_video_url,
                prompt_text,
                ..
            } => {
                require(src_image, "src_image")?;
                require(preview_video_url, "preview_video_url")?;
                require(prompt_text, "prompt_text")
            }
            TaskConfig::VideoEffect {
                video_effect_template,
                preview_video_url,
                ..
            } => {
                require(video_effect_template, "video_effect_template")?;
                require(preview_video_url, "preview_video_url")
            }
            TaskConfig::PortraitStyleRedraw {
                style_index,
                style_ref_url,
                src_image,
                prompt_text,
                ..
            } => {
                let index = style_index.ok_or_else(|| {
                    CoreError::Validation("style_index is required".to_string())
                })?;
                if !(-1..=9).contains(&index) {
                    return Err(CoreError::Validation(format!(
                        "style_index must be -1 or 0..=9 (got {index})"
                    )));
                }
                if index == -1 {
                    require(style_ref_url, "style_ref_url")?;
                }
                require(src_image, "src_image")?;
                require(prompt_text, "prompt_text")
            }
            TaskConfig::SyncPortrait | TaskConfig::SyncGroupPhoto => Ok(()),
            TaskConfig::Unknown => Err(CoreError::Validation(
                "unknown task_execution_type".to_string(),
            )),
        }
    }

    /// Whether the album's cover is a video preview rather than an image.
    pub fn is_video(&self) -> bool {
        matches!(
            self,
            TaskConfig::ImageToVideo { .. } | TaskConfig::VideoEffect { .. }
        )
    }
}

fn require(field: &Option<String>, name: &str) -> Result<(), CoreError> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(()),
        _ => Err(CoreError::Validation(format!("{name} is required"))),
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A persisted album record as returned by the cloud functions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumRecord {
    pub album_id: String,
    pub album_name: String,
    pub album_description: String,
    pub album_image: String,
    #[serde(default)]
    pub theme_styles: Vec<String>,
    pub function_type: String,
    #[serde(default)]
    pub activity_tags: Vec<String>,
    #[serde(default)]
    pub level: AlbumLevel,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub sort_weight: i64,
    #[serde(default)]
    pub published: bool,
    /// Template slots used by the sync execution types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_list: Option<Value>,
    #[serde(flatten)]
    pub task: TaskConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A new album about to be created (no id, no timestamps).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AlbumDraft {
    #[validate(custom(function = non_blank, message = "is required"))]
    pub album_name: String,
    #[validate(custom(function = non_blank, message = "is required"))]
    pub album_description: String,
    #[validate(custom(function = non_blank, message = "is required"))]
    pub album_image: String,
    #[serde(default)]
    pub theme_styles: Vec<String>,
    #[validate(custom(function = non_blank, message = "is required"))]
    pub function_type: String,
    #[serde(default)]
    pub activity_tags: Vec<String>,
    #[serde(default)]
    pub level: AlbumLevel,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub sort_weight: i64,
    #[serde(default)]
    pub published: bool,
    #[serde(flatten)]
    pub task: TaskConfig,
}

impl AlbumDraft {
    /// Validate the draft before any upload or create call is attempted.
    pub fn validate(&self) -> Result<(), CoreError> {
        Validate::validate(self)?;
        self.task.validate()
    }
}

/// A partial update to an existing album.
///
/// Common fields are individually optional; the task-specific fields travel
/// as a whole [`TaskConfig`], so an update can never resend stale fields
/// from a previous execution type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AlbumUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = non_blank, message = "is required"))]
    pub album_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = non_blank, message = "is required"))]
    pub album_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_styles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<AlbumLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_weight: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(flatten)]
    pub task: Option<TaskConfig>,
}

impl AlbumUpdate {
    /// Validate whatever is present; a task config, if supplied, must be a
    /// complete, valid variant.
    pub fn validate(&self) -> Result<(), CoreError> {
        Validate::validate(self)?;
        if let Some(task) = &self.task {
            task.validate()?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        serde_json::to_value(self)
            .map(|v| v.as_object().is_some_and(|o| o.is_empty()))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn image_to_image() -> TaskConfig {
        TaskConfig::ImageToImage {
            src_image: Some("https://cos.example/src.png".into()),
            result_image: Some("https://cos.example/result.png".into()),
            prompt_text: Some("a winter scene".into()),
            style_description: None,
        }
    }

    // -- per-variant validation --

    #[test]
    fn image_to_image_requires_src_and_result() {
        let missing_result = TaskConfig::ImageToImage {
            src_image: Some("s".into()),
            result_image: None,
            prompt_text: Some("p".into()),
            style_description: None,
        };
        let err = missing_result.validate().unwrap_err();
        assert!(err.to_string().contains("result_image"));

        let missing_src = TaskConfig::ImageToImage {
            src_image: None,
            result_image: Some("r".into()),
            prompt_text: Some("p".into()),
            style_description: None,
        };
        let err = missing_src.validate().unwrap_err();
        assert!(err.to_string().contains("src_image"));

        assert!(image_to_image().validate().is_ok());
    }

    #[test]
    fn video_effect_has_no_prompt_field() {
        let config = TaskConfig::VideoEffect {
            video_effect_template: Some("sparkle".into()),
            src_image: Some("s".into()),
            preview_video_url: Some("https://cos.example/preview.mp4".into()),
        };
        assert!(config.validate().is_ok());

        let value = serde_json::to_value(&config).unwrap();
        assert!(value.get("prompt_text").is_none());
        assert_eq!(value["task_execution_type"], "async_video_effect");
    }

    #[test]
    fn video_effect_requires_template() {
        let config = TaskConfig::VideoEffect {
            video_effect_template: None,
            src_image: Some("s".into()),
            preview_video_url: Some("v".into()),
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("video_effect_template"));
    }

    #[test]
    fn portrait_redraw_custom_style_requires_reference_url() {
        let base = |index: i64, reference: Option<&str>| TaskConfig::PortraitStyleRedraw {
            style_index: Some(index),
            style_ref_url: reference.map(String::from),
            src_image: Some("s".into()),
            result_image: None,
            prompt_text: Some("p".into()),
        };

        assert!(base(0, None).validate().is_ok());
        assert!(base(9, None).validate().is_ok());
        assert!(base(-1, Some("https://cos.example/ref.png")).validate().is_ok());

        let err = base(-1, None).validate().unwrap_err();
        assert!(err.to_string().contains("style_ref_url"));

        let err = base(10, None).validate().unwrap_err();
        assert!(err.to_string().contains("style_index"));
    }

    #[test]
    fn image_to_video_requires_preview_and_prompt() {
        let config = TaskConfig::ImageToVideo {
            src_image: Some("s".into()),
            preview_video_url: None,
            prompt_text: Some("p".into()),
            audio_url: None,
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("preview_video_url"));
    }

    #[test]
    fn blank_required_field_rejected() {
        let config = TaskConfig::DoubaoImageToImage {
            src_image: Some("   ".into()),
            result_image: None,
            prompt_text: Some("p".into()),
            style_description: None,
            exclude_result_image: false,
        };
        assert_matches!(config.validate(), Err(CoreError::Validation(_)));
    }

    // -- serialization shape --

    #[test]
    fn serialized_variant_carries_only_its_own_fields() {
        let draft = AlbumDraft {
            album_name: "Winter".into(),
            album_description: "Snowy portraits".into(),
            album_image: "https://cos.example/cover.png".into(),
            theme_styles: vec!["winter".into()],
            function_type: "portrait".into(),
            activity_tags: vec![],
            level: AlbumLevel::Free,
            price: 0.0,
            likes: 0,
            sort_weight: 0,
            published: false,
            task: image_to_image(),
        };

        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["task_execution_type"], "async_image_to_image");
        assert_eq!(value["src_image"], "https://cos.example/src.png");
        // No fields from any other variant leak into the payload.
        assert!(value.get("video_effect_template").is_none());
        assert!(value.get("style_index").is_none());
        assert!(value.get("preview_video_url").is_none());
    }

    #[test]
    fn record_roundtrip_through_wire_shape() {
        let json = serde_json::json!({
            "album_id": "alb_1",
            "album_name": "Winter",
            "album_description": "Snowy portraits",
            "album_image": "https://cos.example/cover.png",
            "theme_styles": ["winter"],
            "function_type": "portrait",
            "activity_tags": ["new"],
            "level": "0",
            "price": 0,
            "likes": 3,
            "sort_weight": 10,
            "published": true,
            "task_execution_type": "async_video_effect",
            "video_effect_template": "sparkle",
            "preview_video_url": "https://cos.example/p.mp4"
        });

        let record: AlbumRecord = serde_json::from_value(json).unwrap();
        assert_matches!(record.task, TaskConfig::VideoEffect { .. });
        assert!(record.task.is_video());
        assert_eq!(record.sort_weight, 10);
    }

    #[test]
    fn unknown_execution_type_is_tolerated_on_read_but_rejected_on_write() {
        let json = serde_json::json!({
            "album_id": "alb_2",
            "album_name": "Legacy",
            "album_description": "Old row",
            "album_image": "https://cos.example/cover.png",
            "function_type": "portrait",
            "task_execution_type": "some_future_type"
        });

        let record: AlbumRecord = serde_json::from_value(json).unwrap();
        assert_matches!(record.task, TaskConfig::Unknown);
        assert!(record.task.validate().is_err());
    }

    // -- draft validation --

    #[test]
    fn draft_requires_name_description_and_cover() {
        let mut draft = AlbumDraft {
            album_name: String::new(),
            album_description: "d".into(),
            album_image: "c".into(),
            theme_styles: vec![],
            function_type: "portrait".into(),
            activity_tags: vec![],
            level: AlbumLevel::default(),
            price: 0.0,
            likes: 0,
            sort_weight: 0,
            published: false,
            task: image_to_image(),
        };
        assert!(draft.validate().is_err());

        // Whitespace-only counts as blank.
        draft.album_name = "   ".into();
        assert!(draft.validate().is_err());

        draft.album_name = "Winter".into();
        draft.album_image = String::new();
        assert!(draft.validate().is_err());

        draft.album_image = "https://cos.example/cover.png".into();
        assert!(draft.validate().is_ok());
    }

    // -- update payload --

    #[test]
    fn update_with_new_task_type_never_carries_stale_fields() {
        let update = AlbumUpdate {
            sort_weight: Some(5),
            task: Some(TaskConfig::VideoEffect {
                video_effect_template: Some("sparkle".into()),
                src_image: Some("s".into()),
                preview_video_url: Some("v".into()),
            }),
            ..Default::default()
        };
        assert!(update.validate().is_ok());

        let value = serde_json::to_value(&update).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(value["task_execution_type"], "async_video_effect");
        assert_eq!(value["sort_weight"], 5);
        // Fields from other variants are absent, not null.
        assert!(!object.contains_key("prompt_text"));
        assert!(!object.contains_key("style_index"));
        assert!(!object.contains_key("album_name"));
    }

    #[test]
    fn weight_only_update_is_minimal() {
        let update = AlbumUpdate {
            sort_weight: Some(42),
            ..Default::default()
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(
            value.as_object().unwrap().keys().collect::<Vec<_>>(),
            vec!["sort_weight"]
        );
    }
}
