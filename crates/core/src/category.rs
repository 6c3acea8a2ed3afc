//! Category taxonomy: function types, theme styles, and activity tags.
//!
//! Categories populate the selectable option lists on every album-editing
//! screen. Only active entries are offered for new selections, but label
//! lookup deliberately ignores the active flag so that codes chosen before
//! a category was retired remain displayable.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::validation::non_blank;

/// The three taxonomy kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    FunctionType,
    ThemeStyle,
    ActivityTag,
}

impl CategoryKind {
    /// Prefix used when deriving a category id from its code.
    pub fn id_prefix(self) -> &'static str {
        match self {
            CategoryKind::FunctionType => "ft_",
            CategoryKind::ThemeStyle => "ts_",
            CategoryKind::ActivityTag => "at_",
        }
    }
}

/// Free-form extra configuration carried by a category.
///
/// Function types use `supported_theme_styles` to declare which theme-style
/// codes they are compatible with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtraConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_zh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guide_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guide_text_zh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_theme_styles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
}

impl ExtraConfig {
    /// Merge an update into an existing config, field by field.
    ///
    /// Fields absent from the update keep their existing value, so editing
    /// a label can never drop a function type's `supported_theme_styles`.
    pub fn merged_with(&self, update: &ExtraConfig) -> ExtraConfig {
        ExtraConfig {
            description: update.description.clone().or_else(|| self.description.clone()),
            description_zh: update
                .description_zh
                .clone()
                .or_else(|| self.description_zh.clone()),
            guide_text: update.guide_text.clone().or_else(|| self.guide_text.clone()),
            guide_text_zh: update
                .guide_text_zh
                .clone()
                .or_else(|| self.guide_text_zh.clone()),
            supported_theme_styles: update
                .supported_theme_styles
                .clone()
                .or_else(|| self.supported_theme_styles.clone()),
            is_featured: update.is_featured.or(self.is_featured),
        }
    }
}

/// A persisted category configuration record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub category_id: String,
    pub category_type: CategoryKind,
    pub category_code: String,
    pub category_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_label_zh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_config: Option<ExtraConfig>,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

fn default_active() -> bool {
    true
}

/// A new category about to be created.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryDraft {
    pub category_type: CategoryKind,
    #[validate(custom(function = non_blank, message = "is required"))]
    pub category_code: String,
    #[validate(custom(function = non_blank, message = "is required"))]
    pub category_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_label_zh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_config: Option<ExtraConfig>,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl CategoryDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        Ok(Validate::validate(self)?)
    }

    /// Derive the category id from kind and code (`ft_portrait`, ...).
    pub fn derived_id(&self) -> String {
        format!("{}{}", self.category_type.id_prefix(), self.category_code)
    }
}

// ---------------------------------------------------------------------------
// Selection helpers
// ---------------------------------------------------------------------------

/// Entries of one kind, sorted by `sort_order` ascending.
///
/// With `active_only` the result contains exactly the entries whose
/// `is_active` flag is set; without it, all entries in the same order.
pub fn filter_sorted(
    categories: &[CategoryConfig],
    kind: CategoryKind,
    active_only: bool,
) -> Vec<CategoryConfig> {
    let mut selected: Vec<CategoryConfig> = categories
        .iter()
        .filter(|c| c.category_type == kind)
        .filter(|c| !active_only || c.is_active)
        .cloned()
        .collect();
    selected.sort_by_key(|c| c.sort_order);
    selected
}

/// Display label for a code, ignoring the active flag.
///
/// Prefers the localized label; falls back to the code itself when the
/// category no longer exists.
pub fn label_for(categories: &[CategoryConfig], kind: CategoryKind, code: &str) -> String {
    categories
        .iter()
        .find(|c| c.category_type == kind && c.category_code == code)
        .map(|c| {
            c.category_label_zh
                .clone()
                .unwrap_or_else(|| c.category_label.clone())
        })
        .unwrap_or_else(|| code.to_string())
}
