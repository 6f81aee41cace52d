pub mod backend;
pub mod config;
pub mod error;
pub mod gesture;
pub mod landmarks;
pub mod prediction;
pub mod relay;

// Re-export commonly used types for convenience
pub use backend::InferenceBackend;
pub use config::{ExecutionProvider, InferenceConfig};
pub use error::RelayError;
pub use gesture::GestureLabel;
pub use landmarks::{LandmarkFrame, Landmarks};
pub use prediction::PredictionResult;
pub use relay::{InferenceRelay, ProcessRequest, ProcessedData};
