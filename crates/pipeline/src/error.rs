use faceglow_ai::AiError;
use faceglow_cloud::CloudError;
use faceglow_core::CoreError;
use thiserror::Error;

use crate::state::WizardStep;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No wizard item at index {0}")]
    NoSuchItem(usize),

    #[error("Wizard is at step {actual:?}, expected {expected:?}")]
    WrongStep { expected: WizardStep, actual: WizardStep },

    #[error(transparent)]
    Model(#[from] AiError),

    #[error(transparent)]
    Cloud(#[from] CloudError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
