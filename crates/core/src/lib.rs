//! Domain types and pure logic for the FaceGlow admin backend.
//!
//! Everything in this crate is side-effect free: album records and their
//! per-variant validation, the category taxonomy, the prompt-template
//! renderer, and the parse chain for model-generated album metadata.

pub mod album;
pub mod category;
pub mod error;
pub mod metadata;
pub mod prompt_template;
pub mod validation;

pub use error::CoreError;
