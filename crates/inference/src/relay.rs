use crate::{
    backend::InferenceBackend,
    error::RelayError,
    gesture::GestureLabel,
    landmarks::{LandmarkFrame, Landmarks},
    prediction::PredictionResult,
};
use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Instant;

pub const STATUS_COMPLETE: &str = "Processing complete";
pub const MESSAGE_RECOGNIZED: &str = "Gesture recognized";

/// Payload of a `process` event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProcessRequest {
    pub landmarks: Landmarks,
}

/// Payload of a `processed_data` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedData {
    pub status: String,
    pub message: String,
    pub predictions: Vec<Vec<f32>>,
    pub gesture: GestureLabel,
    pub confidence: f32,
}

impl ProcessedData {
    /// Fails with `ModelFailure` if any score is NaN or infinite, since JSON has no
    /// encoding for those values.
    pub fn from_prediction(prediction: &PredictionResult) -> Result<Self, RelayError> {
        if let Some(score) = prediction.scores().iter().find(|s| !s.is_finite()) {
            return Err(RelayError::ModelFailure(format!(
                "Model produced a non-finite score: {}",
                score
            )));
        }
        Ok(Self {
            status: STATUS_COMPLETE.to_string(),
            message: MESSAGE_RECOGNIZED.to_string(),
            predictions: prediction.as_batch(),
            gesture: prediction.label()?,
            confidence: prediction.confidence(),
        })
    }
}

#[derive(Clone)]
struct RelayMetrics {
    duration: Histogram<f64>,
    requests: Counter<u64>,
    errors: Counter<u64>,
}

impl RelayMetrics {
    fn new(meter_name: &'static str) -> Self {
        let meter = global::meter(meter_name);
        let latency_buckets = [
            0.001, 0.002, 0.005, 0.01, 0.02, 0.03, 0.05, 0.075, 0.1, 0.15, 0.2, 0.5, 1.0,
        ];
        Self {
            duration: meter
                .f64_histogram("relay_inference_duration_seconds")
                .with_description("Time to validate, reshape and classify one landmark window")
                .with_unit("s")
                .with_boundaries(latency_buckets.to_vec())
                .build(),
            requests: meter
                .u64_counter("relay_requests_total")
                .with_description("Total process requests received")
                .build(),
            errors: meter
                .u64_counter("relay_errors_total")
                .with_description("Process requests answered with an error")
                .build(),
        }
    }
}

/// The single shared classifier, handed to every connection.
///
/// The backend sits behind a mutex so only one window is classified at a
/// time; each call is otherwise independent of every other.
pub struct InferenceRelay<B> {
    backend: Arc<Mutex<B>>,
    metrics: RelayMetrics,
}

impl<B> Clone for InferenceRelay<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            metrics: self.metrics.clone(),
        }
    }
}

impl<B: InferenceBackend> InferenceRelay<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(Mutex::new(backend)),
            metrics: RelayMetrics::new("inference"),
        }
    }

    /// Classify one window without blocking the async runtime.
    pub async fn process(&self, request: ProcessRequest) -> Result<ProcessedData, RelayError> {
        let relay = self.clone();
        tokio::task::spawn_blocking(move || relay.process_blocking(request))
            .await
            .map_err(|e| {
                RelayError::ModelFailure(format!(
                    "Inference task failed (task panicked or cancelled): {}",
                    e
                ))
            })?
    }

    pub fn process_blocking(&self, request: ProcessRequest) -> Result<ProcessedData, RelayError> {
        let start = Instant::now();
        self.metrics.requests.add(1, &[]);

        let result = LandmarkFrame::try_from(request.landmarks)
            .and_then(|frame| self.predict(frame))
            .and_then(|prediction| ProcessedData::from_prediction(&prediction));

        match &result {
            Ok(data) => {
                self.metrics
                    .duration
                    .record(start.elapsed().as_secs_f64(), &[]);
                tracing::debug!(
                    gesture = %data.gesture,
                    confidence = data.confidence,
                    "Gesture classified"
                );
            }
            Err(e) => {
                self.metrics
                    .errors
                    .add(1, &[KeyValue::new("kind", e.kind())]);
            }
        }

        result
    }

    pub fn predict(&self, frame: LandmarkFrame) -> Result<PredictionResult, RelayError> {
        let input = frame.into_tensor()?;

        let output = {
            let _infer_span = tracing::info_span!("model_inference").entered();
            let mut backend = self
                .backend
                .lock()
                .map_err(|_| RelayError::ModelFailure("model lock poisoned".to_string()))?;
            backend.infer(&input)?
        };

        PredictionResult::from_output(&output)
    }
}
