use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use gateway::ws::cors_layer;
use gateway::{AppState, router};
use inference::{InferenceBackend, InferenceConfig, InferenceRelay};
use ndarray::{Array2, Array3};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::time::timeout;
use tower::ServiceExt;

const POLL_TIMEOUT: Duration = Duration::from_secs(5);
/// Engine.IO v4 separates packets in one polling payload with a record separator.
const PACKET_SEPARATOR: char = '\u{1e}';

struct GoodbyeBackend;

impl InferenceBackend for GoodbyeBackend {
    fn load_model(_config: &InferenceConfig) -> anyhow::Result<Self> {
        Ok(Self)
    }

    fn infer(&mut self, _input: &Array3<f32>) -> anyhow::Result<Array2<f32>> {
        Ok(Array2::from_shape_vec((1, 4), vec![0.1, 0.2, 0.1, 0.6])?)
    }
}

fn app() -> Router {
    let state = AppState::new(InferenceRelay::new(GoodbyeBackend));
    router(state, cors_layer("*").unwrap())
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Opens an Engine.IO polling session and returns its sid.
async fn handshake(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::get("/socket.io/?EIO=4&transport=polling")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "Socket.IO must be served on the router");

    let body = body_text(response).await;
    assert!(body.starts_with('0'), "Expected an Engine.IO open packet, got {:?}", body);
    let open: Value = serde_json::from_str(&body[1..]).unwrap();
    open["sid"].as_str().unwrap().to_string()
}

async fn post(app: &Router, sid: &str, packet: String) {
    let response = app
        .clone()
        .oneshot(
            Request::post(format!("/socket.io/?EIO=4&transport=polling&sid={}", sid))
                .header(header::CONTENT_TYPE, "text/plain;charset=UTF-8")
                .body(Body::from(packet))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

/// Polls until a Socket.IO event named `event` arrives and returns its payload.
async fn wait_for_event(app: &Router, sid: &str, event: &str) -> Value {
    let poll = async {
        loop {
            let response = app
                .clone()
                .oneshot(
                    Request::get(format!("/socket.io/?EIO=4&transport=polling&sid={}", sid))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let body = body_text(response).await;
            for packet in body.split(PACKET_SEPARATOR) {
                let Some(array) = packet.strip_prefix("42") else {
                    continue;
                };
                let parsed: Value = serde_json::from_str(array).unwrap();
                if parsed[0] == event {
                    return parsed[1].clone();
                }
            }
        }
    };

    timeout(POLL_TIMEOUT, poll)
        .await
        .unwrap_or_else(|_| panic!("Timed out waiting for {:?}", event))
}

async fn connected_client(app: &Router) -> String {
    let sid = handshake(app).await;
    post(app, &sid, "40".to_string()).await;
    sid
}

fn process_packet(len: usize) -> String {
    format!("42{}", json!(["process", {"landmarks": vec![0.0f32; len]}]))
}

#[tokio::test]
async fn test_polling_handshake_is_served() {
    let app = app();
    let sid = handshake(&app).await;
    assert!(!sid.is_empty());
}

#[tokio::test]
async fn test_connect_emits_message() {
    let app = app();
    let sid = connected_client(&app).await;

    let data = wait_for_event(&app, &sid, "message").await;
    assert_eq!(data, json!({"status": "Connected to server"}));
}

#[tokio::test]
async fn test_process_answers_processed_data() {
    let app = app();
    let sid = connected_client(&app).await;
    wait_for_event(&app, &sid, "message").await;

    post(&app, &sid, process_packet(3960)).await;
    let data = wait_for_event(&app, &sid, "processed_data").await;

    assert_eq!(data["status"], "Processing complete");
    assert_eq!(data["gesture"], "Goodbye");
    assert!((data["confidence"].as_f64().unwrap() - 0.6).abs() < 1e-6);
    assert_eq!(data["predictions"][0].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_bad_process_answers_error() {
    let app = app();
    let sid = connected_client(&app).await;
    wait_for_event(&app, &sid, "message").await;

    post(&app, &sid, process_packet(12)).await;
    let data = wait_for_event(&app, &sid, "error").await;
    assert_eq!(data["status"], "error");
    assert_eq!(data["kind"], "shape_mismatch");

    post(&app, &sid, r#"42["process",{"frames":[]}]"#.to_string()).await;
    let data = wait_for_event(&app, &sid, "error").await;
    assert_eq!(data["kind"], "invalid_payload");

    post(&app, &sid, process_packet(3960)).await;
    let data = wait_for_event(&app, &sid, "processed_data").await;
    assert_eq!(data["gesture"], "Goodbye", "Errors must not end the session");
}
