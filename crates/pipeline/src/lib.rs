//! Batch album generation pipeline.
//!
//! Drives the multi-step wizard: target/source image intake, prompt
//! generation, cover generation, metadata generation and the final
//! commit that creates one album record per target image.

pub mod error;
pub mod runner;
pub mod state;

pub use error::{PipelineError, PipelineResult};
pub use runner::{CommitReport, PipelineRunner};
pub use state::{AlbumItem, CommitSettings, ImageInput, WizardState, WizardStep};
