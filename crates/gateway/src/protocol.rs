//! Events exchanged with clients.
//!
//! On the plain WebSocket every text frame is `{"event": <name>, "data": <payload>}`.
//! Socket.IO carries the same event names and payloads in its own framing.

use inference::{ProcessRequest, ProcessedData, RelayError};
use serde::{Deserialize, Serialize};

pub const EVENT_PROCESS: &str = "process";
pub const STATUS_CONNECTED: &str = "Connected to server";
pub const STATUS_ERROR: &str = "error";

/// Events a client may send.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Process(ProcessRequest),
    /// Any event name without a handler; carried for logging only.
    Unknown(String),
}

#[derive(Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: serde_json::Value,
}

impl ClientEvent {
    pub fn decode(text: &str) -> Result<Self, RelayError> {
        let envelope: Envelope = serde_json::from_str(text)
            .map_err(|e| RelayError::InvalidPayload(format!("malformed event: {}", e)))?;

        Self::from_parts(envelope.event, envelope.data)
    }

    /// Build from an event name and its already-parsed payload.
    pub fn from_parts(event: String, data: serde_json::Value) -> Result<Self, RelayError> {
        match event.as_str() {
            EVENT_PROCESS => serde_json::from_value(data)
                .map(ClientEvent::Process)
                .map_err(|e| RelayError::InvalidPayload(e.to_string())),
            _ => Ok(ClientEvent::Unknown(event)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub status: String,
    pub kind: String,
    pub message: String,
}

impl From<&RelayError> for ErrorPayload {
    fn from(err: &RelayError) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// Events the server emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    Message(StatusMessage),
    ProcessedData(ProcessedData),
    Error(ErrorPayload),
}

impl ServerEvent {
    pub fn connected() -> Self {
        ServerEvent::Message(StatusMessage {
            status: STATUS_CONNECTED.to_string(),
        })
    }

    pub fn error(err: &RelayError) -> Self {
        ServerEvent::Error(err.into())
    }

    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Message(_) => "message",
            ServerEvent::ProcessedData(_) => "processed_data",
            ServerEvent::Error(_) => "error",
        }
    }

    /// Serialize as a WebSocket envelope. A payload that cannot be encoded is
    /// replaced by a `model_failure` error so the client always gets a reply.
    pub fn encode(&self) -> String {
        encode_or_error(self, self.name())
    }
}

pub(crate) fn encode_or_error<T: Serialize>(value: &T, name: &str) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(event = name, error = %e, "JSON serialization error");
            let fallback = ServerEvent::error(&RelayError::ModelFailure(format!(
                "failed to encode {} event",
                name
            )));
            serde_json::to_string(&fallback).unwrap_or_else(|_| {
                r#"{"event":"error","data":{"status":"error","kind":"model_failure","message":"encoding failed"}}"#
                    .to_string()
            })
        }
    }
}
