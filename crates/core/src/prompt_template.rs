//! Prompt templates with `{variable}` slots and a pure renderer.
//!
//! Templates carry optional style/quality enhancement word lists that are
//! appended to the rendered text, plus an optional negative-prompt template
//! rendered through the same substitution.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Regex matching `{placeholder}` tokens in templates.
pub const PLACEHOLDER_PATTERN: &str = r"\{[a-zA-Z_][a-zA-Z0-9_]*\}";

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PLACEHOLDER_PATTERN).expect("valid regex"));

/// Declaration of one template variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub required: bool,
}

/// The structured body of a prompt template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptStructure {
    pub base_template: String,
    #[serde(default)]
    pub variables: HashMap<String, VariableSpec>,
    #[serde(default)]
    pub style_enhancements: Vec<String>,
    #[serde(default)]
    pub quality_enhancements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt_template: Option<String>,
}

/// A named, typed prompt template record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub template_id: String,
    pub template_name: String,
    pub template_type: String,
    pub prompt_structure: PromptStructure,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub usage_count: i64,
}

fn default_active() -> bool {
    true
}

/// The rendered output: final prompt text with enhancements applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPrompt {
    pub prompt_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
}

/// Extract all placeholder names from a template, de-duplicated and sorted.
pub fn extract_placeholders(template: &str) -> Vec<String> {
    let mut placeholders: Vec<String> = PLACEHOLDER_RE
        .find_iter(template)
        .map(|m| {
            let s = m.as_str();
            s[1..s.len() - 1].to_string()
        })
        .collect();
    placeholders.sort();
    placeholders.dedup();
    placeholders
}

/// Substitute variables into the structure and append enhancement lists.
///
/// Values are looked up first in `values`, then in the variable's declared
/// default. A placeholder with neither, or a required variable with a blank
/// value, is a validation error.
pub fn render(
    structure: &PromptStructure,
    values: &HashMap<String, String>,
) -> Result<RenderedPrompt, CoreError> {
    for (name, spec) in &structure.variables {
        if spec.required {
            let provided = values
                .get(name)
                .or(spec.default_value.as_ref())
                .map(|v| !v.trim().is_empty())
                .unwrap_or(false);
            if !provided {
                return Err(CoreError::Validation(format!(
                    "missing required template variable: {name}"
                )));
            }
        }
    }

    let mut prompt_text = substitute(&structure.base_template, structure, values)?;

    let enhancements: Vec<&str> = structure
        .style_enhancements
        .iter()
        .chain(structure.quality_enhancements.iter())
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect();
    if !enhancements.is_empty() {
        prompt_text = format!("{prompt_text}, {}", enhancements.join(", "));
    }

    let style_description = if structure.style_enhancements.is_empty() {
        None
    } else {
        Some(structure.style_enhancements.join(", "))
    };

    let negative_prompt = structure
        .negative_prompt_template
        .as_deref()
        .map(|template| substitute(template, structure, values))
        .transpose()?;

    Ok(RenderedPrompt {
        prompt_text,
        style_description,
        negative_prompt,
    })
}

fn substitute(
    template: &str,
    structure: &PromptStructure,
    values: &HashMap<String, String>,
) -> Result<String, CoreError> {
    let mut missing: Option<String> = None;
    let rendered = PLACEHOLDER_RE.replace_all(template, |captures: &regex::Captures<'_>| {
        let token = captures.get(0).map(|m| m.as_str()).unwrap_or_default();
        let name = &token[1..token.len() - 1];
        match values.get(name).cloned().or_else(|| {
            structure
                .variables
                .get(name)
                .and_then(|spec| spec.default_value.clone())
        }) {
            Some(value) => value,
            None => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });
    if let Some(name) = missing {
        return Err(CoreError::Validation(format!(
            "no value for template variable: {name}"
        )));
    }
    Ok(rendered.into_owned())
}
