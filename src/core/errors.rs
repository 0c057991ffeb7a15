use thiserror::Error;

use crate::core::models::UiState;

/// Engine bring-up failed. Cloneable so every caller waiting on the same
/// initialization receives an identical error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("OCR engine initialization failed: {cause}")]
pub struct EngineInitializationError {
    pub cause: String,
}

impl EngineInitializationError {
    pub fn from_cause(cause: impl std::fmt::Display) -> Self {
        Self {
            cause: format!("{:#}", cause),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognitionError {
    #[error("OCR engine is not ready: {0}")]
    EngineNotReady(#[from] EngineInitializationError),

    #[error("Text recognition failed: {cause}")]
    Recognition { cause: String },
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Unsupported file type '{mime_type}', expected an image")]
    UnsupportedFileType { mime_type: String },

    #[error("Operation '{operation}' is not valid in state {state:?}")]
    InvalidState {
        operation: &'static str,
        state: UiState,
    },

    #[error("There is no recognized text to copy")]
    NothingToCopy,

    #[error("There is no recognized text to download")]
    NothingToDownload,

    #[error("Clipboard access failed: {0:#}")]
    Clipboard(anyhow::Error),

    #[error("Saving the result failed: {0:#}")]
    Export(anyhow::Error),
}

pub type ControllerResult<T> = Result<T, ControllerError>;
