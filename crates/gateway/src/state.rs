use inference::{InferenceBackend, InferenceRelay};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared by every connection: the relay (and its single model) plus a client id counter.
pub struct AppState<B> {
    pub relay: InferenceRelay<B>,
    next_client_id: Arc<AtomicU64>,
}

impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            relay: self.relay.clone(),
            next_client_id: Arc::clone(&self.next_client_id),
        }
    }
}

impl<B: InferenceBackend> AppState<B> {
    pub fn new(relay: InferenceRelay<B>) -> Self {
        Self {
            relay,
            next_client_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn next_client_id(&self) -> u64 {
        self.next_client_id.fetch_add(1, Ordering::Relaxed)
    }
}
