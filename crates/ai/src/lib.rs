//! Clients for the external model endpoints.
//!
//! Two seams: [`ChatModel`] over an OpenAI-compatible chat-completions
//! endpoint (vision description, prompt rewriting, metadata generation) and
//! [`ImageModel`] over an image-generation endpoint. The wizard pipeline
//! talks to the traits; production wires in the HTTP clients.

pub mod chat;
pub mod error;
pub mod image;
pub mod messages;
pub mod prompts;

pub use chat::{ChatClient, ChatModel, ChatRequest};
pub use error::{AiError, AiResult};
pub use image::{ImageClient, ImageModel};
pub use messages::{encode_data_url, ImageUrl, Message, MessageContent, MessagePart};
