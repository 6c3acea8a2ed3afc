//! Chat message types for the OpenAI-compatible wire format.

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: MessageContent,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user_parts(parts: Vec<MessagePart>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Parts(parts),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<MessagePart>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MessagePart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

impl MessagePart {
    pub fn text(text: impl Into<String>) -> Self {
        MessagePart::Text { text: text.into() }
    }

    pub fn image(data_url: impl Into<String>) -> Self {
        MessagePart::ImageUrl {
            image_url: ImageUrl {
                url: data_url.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Encode raw image bytes as a `data:` URL for inline transport.
pub fn encode_data_url(bytes: &[u8], content_type: &str) -> String {
    let b64 = general_purpose::STANDARD.encode(bytes);
    format!("data:{content_type};base64,{b64}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_carries_content_type() {
        let url = encode_data_url(b"abc", "image/png");
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn parts_serialize_with_type_tags() {
        let message = Message::user_parts(vec![
            MessagePart::image("data:image/png;base64,AAAA"),
            MessagePart::text("describe this"),
        ]);
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["content"][0]["type"], "image_url");
        assert_eq!(value["content"][1]["type"], "text");
    }
}
