use thiserror::Error;

/// Per-request failures. None of them is fatal to the server.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Shape mismatch: expected {expected} landmark values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Model failure: {0}")]
    ModelFailure(String),
}

impl RelayError {
    /// Stable identifier sent to clients and used as a metric attribute.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::InvalidPayload(_) => "invalid_payload",
            RelayError::ShapeMismatch { .. } => "shape_mismatch",
            RelayError::ModelFailure(_) => "model_failure",
        }
    }
}

impl From<anyhow::Error> for RelayError {
    fn from(err: anyhow::Error) -> Self {
        RelayError::ModelFailure(format!("{:#}", err))
    }
}
