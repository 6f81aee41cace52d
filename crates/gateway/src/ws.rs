use crate::config::GatewayConfig;
use crate::protocol::ServerEvent;
use crate::session::Session;
use crate::socketio::socketio_layer;
use crate::state::AppState;
use axum::{
    Router,
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    http::{HeaderValue, Method},
    response::IntoResponse,
    routing::get,
};
use inference::InferenceBackend;
use tower_http::cors::CorsLayer;

/// `/ws` speaks JSON envelopes, `/socket.io/` serves browser Socket.IO clients.
pub fn router<B: InferenceBackend>(state: AppState<B>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/ws", get(ws_handler::<B>))
        .route("/health", get(health))
        .layer(socketio_layer(state.clone()))
        .layer(cors)
        .with_state(state)
}

pub async fn run_server<B: InferenceBackend>(
    config: &GatewayConfig,
    state: AppState<B>,
) -> anyhow::Result<()> {
    let app = router(state, cors_layer(&config.allowed_origin)?);

    let listener = tokio::net::TcpListener::bind(&config.ws_addr).await?;
    tracing::info!(
        addr = %config.ws_addr,
        allowed_origin = %config.allowed_origin,
        "WebSocket server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("WebSocket server stopped");
    Ok(())
}

/// `*` allows any origin, anything else must be a single exact origin.
pub fn cors_layer(allowed_origin: &str) -> anyhow::Result<CorsLayer> {
    if allowed_origin == "*" {
        return Ok(CorsLayer::permissive());
    }

    let origin: HeaderValue = allowed_origin.parse()?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET]))
}

async fn health() -> &'static str {
    "ok"
}

async fn ws_handler<B: InferenceBackend>(
    ws: WebSocketUpgrade,
    State(state): State<AppState<B>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket<B: InferenceBackend>(mut socket: WebSocket, state: AppState<B>) {
    let session = Session::new(state.next_client_id(), state.relay.clone());

    if send_event(&mut socket, &session.on_connect()).await.is_err() {
        session.on_disconnect();
        return;
    }

    while let Some(msg) = socket.recv().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(client_id = session.client_id(), error = %e, "WebSocket receive error");
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                if let Some(event) = session.on_text(&text).await {
                    if send_event(&mut socket, &event).await.is_err() {
                        break;
                    }
                }
            }
            Message::Binary(_) => {
                tracing::debug!(client_id = session.client_id(), "Ignoring binary frame");
            }
            Message::Close(_) => break,
            Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    session.on_disconnect();
}

async fn send_event(socket: &mut WebSocket, event: &ServerEvent) -> Result<(), axum::Error> {
    socket.send(Message::Text(event.encode())).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
