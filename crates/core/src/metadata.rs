//! Parse chain for model-generated album metadata.
//!
//! The metadata model is asked for strict JSON but does not reliably return
//! it, so parsing runs through three tiers: a strict parse of the full
//! response, a lenient parse of the first balanced `{...}` substring, and
//! finally a hand-built default derived from the structured prompt. A parse
//! failure is never an error; the chain always yields usable metadata.

use serde::{Deserialize, Serialize};

/// Album name used when the model output yields no usable name.
pub const DEFAULT_ALBUM_NAME: &str = "AI Generated Album";

/// Number of characters of the structured prompt used as the last-resort
/// album description.
pub const DEFAULT_DESCRIPTION_CHARS: usize = 100;

/// The JSON shape requested from the metadata model.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratedMetadata {
    #[serde(default)]
    pub album_name: String,
    #[serde(default)]
    pub album_description: String,
    #[serde(default)]
    pub theme_styles: Vec<String>,
    #[serde(default)]
    pub activity_tags: Vec<String>,
}

/// Final metadata attached to a wizard item, after all fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumMetadata {
    pub album_name: String,
    pub album_description: String,
    pub prompt_text: String,
    pub style_description: String,
    pub theme_styles: Vec<String>,
    pub activity_tags: Vec<String>,
}

/// Tier 1: strict parse of the entire response text.
pub fn parse_strict(text: &str) -> Option<GeneratedMetadata> {
    serde_json::from_str(text).ok()
}

/// Tier 2: strict parse of the first balanced `{...}` substring.
pub fn parse_lenient(text: &str) -> Option<GeneratedMetadata> {
    extract_balanced_object(text).and_then(|candidate| serde_json::from_str(candidate).ok())
}

/// Tier 3: fixed default name, first 100 characters of the structured
/// prompt as description, empty tag arrays.
pub fn parse_default(structured_prompt: &str) -> GeneratedMetadata {
    GeneratedMetadata {
        album_name: DEFAULT_ALBUM_NAME.to_string(),
        album_description: truncate_chars(structured_prompt, DEFAULT_DESCRIPTION_CHARS),
        theme_styles: Vec::new(),
        activity_tags: Vec::new(),
    }
}

/// Run the full chain and apply per-field fallbacks.
///
/// Even after a successful parse, an empty name or description falls back
/// the same way as a failed parse. `prompt_text` is always the structured
/// prompt; `style_description` mirrors the description.
pub fn parse_album_metadata(response_text: &str, structured_prompt: &str) -> AlbumMetadata {
    let parsed = parse_strict(response_text)
        .or_else(|| parse_lenient(response_text))
        .unwrap_or_else(|| parse_default(structured_prompt));

    let album_name = if parsed.album_name.trim().is_empty() {
        DEFAULT_ALBUM_NAME.to_string()
    } else {
        parsed.album_name
    };
    let album_description = if parsed.album_description.trim().is_empty() {
        truncate_chars(structured_prompt, DEFAULT_DESCRIPTION_CHARS)
    } else {
        parsed.album_description
    };

    AlbumMetadata {
        album_name,
        style_description: album_description.clone(),
        album_description,
        prompt_text: structured_prompt.to_string(),
        theme_styles: parsed.theme_styles,
        activity_tags: parsed.activity_tags,
    }
}

/// First balanced `{...}` substring of `text`, if any.
///
/// Brace depth is tracked outside of string literals so braces inside
/// generated descriptions cannot unbalance the scan.
fn extract_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
