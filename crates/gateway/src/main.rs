use common::{TelemetryGuard, setup_logging};
use gateway::{AppState, GatewayConfig, run_server};
use inference::backend::ort::OrtBackend;
use inference::{InferenceBackend, InferenceRelay};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::from_env()?;

    let _telemetry = match config.otel_endpoint.as_deref() {
        Some(endpoint) => Some(TelemetryGuard::init("gateway", endpoint, config.environment)?),
        None => {
            setup_logging(config.environment);
            None
        }
    };

    tracing::info!(
        config = ?config,
        "Loaded configuration"
    );

    tracing::info!(model_path = %config.inference.model_path, "Loading gesture model");
    let backend = OrtBackend::load_model(&config.inference)?;

    let state = AppState::new(InferenceRelay::new(backend));
    run_server(&config, state).await
}
