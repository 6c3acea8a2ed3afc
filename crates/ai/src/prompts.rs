//! Fixed instruction sets and request builders for the wizard's model calls.

use crate::chat::ChatRequest;
use crate::messages::{Message, MessagePart};

/// Vision model used to describe target style images.
pub const DESCRIBE_MODEL: &str = "qwen-vl-max";
/// Text model used for prompt rewriting and metadata generation.
pub const TEXT_MODEL: &str = "qwen-plus";

/// Instruction sent alongside the two images in the description call. The
/// second image is the operator's selfie and must stay undescribed.
const DESCRIBE_INSTRUCTION: &str = "In one concise paragraph, describe the visual style, \
scene and main elements of the first image (the target style image). The second image is a \
person's selfie provided for reference only; do not describe it.";

/// System instruction for the rewrite call: person references become the
/// fixed "the person in the image" phrasing, everything else is preserved.
const REWRITE_SYSTEM_PROMPT: &str = "You are a prompt rewriting expert. Rewrite the prompt \
the user provides into a structured prompt for an image-to-image task.\n\nRules:\n\
1. Rewrite any description of a person (\"a person\", \"a woman\", \"a man\", \"the subject\") \
as \"the person in the image ...\", keeping the original descriptive attributes.\n\
2. Keep every description of style, composition, color, background and scene unchanged.\n\
3. The rewritten prompt must stay complete and usable for an image-to-image task.\n\
4. If the prompt contains no person description, return it unchanged.\n\n\
Return only the rewritten prompt, with no explanation.";

/// System instruction for metadata generation; strict JSON is requested,
/// though the parse chain downstream tolerates anything.
const METADATA_SYSTEM_PROMPT: &str = "You are an album metadata expert. From the information \
the user provides, generate the album's name and description.\n\nRules:\n\
1. Album name: short and appealing, reflecting the style and theme, 10-20 characters.\n\
2. Album description: the album's character, style and occasions, 50-100 characters.\n\
3. Theme styles: 2-4 theme style tags derived from the prompt and imagery.\n\
4. Activity tags: 1-2 optional activity tags (such as \"new\" or \"free\").\n\n\
Respond with JSON only, in this exact shape:\n\
{\n  \"album_name\": \"...\",\n  \"album_description\": \"...\",\n  \
\"theme_styles\": [\"...\"],\n  \"activity_tags\": [\"...\"]\n}";

/// Describe the target image's style and scene (vision call).
///
/// Part order matters: target image first, source selfie second, then the
/// instruction referring to them by position.
pub fn describe_request(target_data_url: &str, source_data_url: &str) -> ChatRequest {
    ChatRequest {
        model: DESCRIBE_MODEL.to_string(),
        messages: vec![Message::user_parts(vec![
            MessagePart::image(target_data_url),
            MessagePart::image(source_data_url),
            MessagePart::text(DESCRIBE_INSTRUCTION),
        ])],
        temperature: 0.7,
        max_tokens: 500,
    }
}

/// Rewrite a generated description into the structured phrasing.
pub fn rewrite_request(generated_prompt: &str) -> ChatRequest {
    ChatRequest {
        model: TEXT_MODEL.to_string(),
        messages: vec![
            Message::system(REWRITE_SYSTEM_PROMPT),
            Message::user(format!("Rewrite the following prompt:\n\n{generated_prompt}")),
        ],
        temperature: 0.3,
        max_tokens: 500,
    }
}

/// Generate album metadata from the accumulated prompts.
pub fn metadata_request(structured_prompt: &str, generated_prompt: Option<&str>) -> ChatRequest {
    let mut user_prompt = format!(
        "Generate album metadata from the following information:\n\n\
         Final prompt: {structured_prompt}\n\n"
    );
    if let Some(original) = generated_prompt {
        user_prompt.push_str(&format!("Original description: {original}\n\n"));
    }
    user_prompt.push_str("A cover image has already been generated.\n");

    ChatRequest {
        model: TEXT_MODEL.to_string(),
        messages: vec![
            Message::system(METADATA_SYSTEM_PROMPT),
            Message::user(user_prompt),
        ],
        temperature: 0.7,
        max_tokens: 1000,
    }
}
