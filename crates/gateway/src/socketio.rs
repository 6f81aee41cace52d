//! Socket.IO transport for browser clients using `socket.io-client`.
//!
//! Served under `/socket.io/` on the same listener as `/ws`. Each socket gets
//! its own [`Session`], so both transports answer identically.

use crate::protocol::{EVENT_PROCESS, ErrorPayload, ServerEvent};
use crate::session::Session;
use crate::state::AppState;
use inference::{InferenceBackend, RelayError};
use socketioxide::{
    SocketIo,
    extract::{SocketRef, TryData},
    layer::SocketIoLayer,
    socket::DisconnectReason,
};
use std::sync::Arc;

/// Largest accepted Engine.IO payload; one window of float landmarks is well under this.
const MAX_PAYLOAD_BYTES: u64 = 1_000_000;

pub fn socketio_layer<B: InferenceBackend>(state: AppState<B>) -> SocketIoLayer {
    let (layer, io) = SocketIo::builder()
        .max_payload(MAX_PAYLOAD_BYTES)
        .build_layer();

    io.ns("/", move |socket: SocketRef| on_connect(socket, state.clone()));

    layer
}

async fn on_connect<B: InferenceBackend>(socket: SocketRef, state: AppState<B>) {
    let session = Arc::new(Session::new(state.next_client_id(), state.relay.clone()));
    tracing::debug!(client_id = session.client_id(), sid = %socket.id, "Socket.IO handshake");

    emit_event(&socket, &session.on_connect());

    let process_session = Arc::clone(&session);
    socket.on(
        EVENT_PROCESS,
        move |socket: SocketRef, TryData(data): TryData<serde_json::Value>| async move {
            let reply = match data {
                Ok(data) => process_session.on_event(EVENT_PROCESS, data).await,
                Err(e) => Some(ServerEvent::error(&RelayError::InvalidPayload(e.to_string()))),
            };
            if let Some(event) = reply {
                emit_event(&socket, &event);
            }
        },
    );

    socket.on_disconnect(move |reason: DisconnectReason| async move {
        tracing::debug!(client_id = session.client_id(), reason = ?reason, "Socket.IO disconnect");
        session.on_disconnect();
    });
}

fn emit_event(socket: &SocketRef, event: &ServerEvent) {
    let result = match event {
        ServerEvent::Message(payload) => socket.emit(event.name(), payload),
        ServerEvent::ProcessedData(payload) => socket.emit(event.name(), payload),
        ServerEvent::Error(payload) => socket.emit(event.name(), payload),
    };

    if let Err(e) = result {
        tracing::error!(sid = %socket.id, event = event.name(), error = %e, "Socket.IO emit failed");
        if !matches!(event, ServerEvent::Error(_)) {
            let fallback = ErrorPayload::from(&RelayError::ModelFailure(format!(
                "failed to encode {} event",
                event.name()
            )));
            let _ = socket.emit("error", &fallback);
        }
    }
}
