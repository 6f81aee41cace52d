use crate::protocol::{ClientEvent, ServerEvent};
use inference::{InferenceBackend, InferenceRelay, RelayError};
use std::sync::atomic::{AtomicU64, Ordering};

/// Server side of one client connection, on either transport.
///
/// Holds no inference state; every `process` event is classified on its own.
pub struct Session<B> {
    client_id: u64,
    relay: InferenceRelay<B>,
    processed: AtomicU64,
    failed: AtomicU64,
}

impl<B: InferenceBackend> Session<B> {
    pub fn new(client_id: u64, relay: InferenceRelay<B>) -> Self {
        Self {
            client_id,
            relay,
            processed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    pub fn client_id(&self) -> u64 {
        self.client_id
    }

    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Acknowledgment sent once, before any other event.
    pub fn on_connect(&self) -> ServerEvent {
        tracing::info!(client_id = self.client_id, "Client connected");
        ServerEvent::connected()
    }

    /// Handle one WebSocket text frame. `None` means nothing is sent back.
    pub async fn on_text(&self, text: &str) -> Option<ServerEvent> {
        self.dispatch(ClientEvent::decode(text)).await
    }

    /// Handle one named event whose payload was already decoded by the transport.
    pub async fn on_event(&self, event: &str, data: serde_json::Value) -> Option<ServerEvent> {
        self.dispatch(ClientEvent::from_parts(event.to_string(), data))
            .await
    }

    async fn dispatch(&self, event: Result<ClientEvent, RelayError>) -> Option<ServerEvent> {
        let result = match event {
            Ok(ClientEvent::Process(request)) => self.relay.process(request).await,
            Ok(ClientEvent::Unknown(event)) => {
                tracing::debug!(client_id = self.client_id, event = %event, "Ignoring unhandled event");
                return None;
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(data) => {
                self.processed.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(
                    client_id = self.client_id,
                    gesture = %data.gesture,
                    confidence = data.confidence,
                    "Sending prediction"
                );
                Some(ServerEvent::ProcessedData(data))
            }
            Err(e) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                self.log_failure(&e);
                Some(ServerEvent::error(&e))
            }
        }
    }

    pub fn on_disconnect(&self) {
        tracing::info!(
            client_id = self.client_id,
            processed = self.processed(),
            failed = self.failed(),
            "Client disconnected"
        );
    }

    fn log_failure(&self, err: &RelayError) {
        match err {
            RelayError::ModelFailure(_) => {
                tracing::error!(client_id = self.client_id, error = %err, "Inference failed");
            }
            RelayError::InvalidPayload(_) | RelayError::ShapeMismatch { .. } => {
                tracing::warn!(client_id = self.client_id, error = %err, "Rejected request");
            }
        }
    }
}
