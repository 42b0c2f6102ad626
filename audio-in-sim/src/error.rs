use thiserror::Error;

use audio_in_core::CaptureError;

/// Errors raised while setting up or reporting a simulated run.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("scenario JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("scenario file: {0}")]
    Io(#[from] std::io::Error),
}
