use crate::config::InferenceConfig;
use ndarray::{Array2, Array3};

#[cfg(feature = "ort-backend")]
pub mod ort;

/// A loaded gesture classifier.
///
/// `infer` takes `&mut self` because runtime sessions are not safe to run
/// concurrently; callers share a backend through [`crate::InferenceRelay`],
/// which serializes access.
pub trait InferenceBackend: Send + 'static {
    fn load_model(config: &InferenceConfig) -> anyhow::Result<Self>
    where
        Self: Sized;

    /// Run inference on a `[1, 30, 132]` landmark window.
    ///
    /// Returns the `[1, num_classes]` score matrix.
    fn infer(&mut self, input: &Array3<f32>) -> anyhow::Result<Array2<f32>>;
}
