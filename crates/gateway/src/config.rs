use std::env;

use inference::InferenceConfig;

pub use common::Environment;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub environment: Environment,
    pub ws_addr: String,
    pub allowed_origin: String,
    pub otel_endpoint: Option<String>,
    pub inference: InferenceConfig,
}

impl GatewayConfig {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> anyhow::Result<Self> {
        let environment = Environment::from_env();

        let ws_addr =
            env::var("GATEWAY_WS_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_string());

        let allowed_origin = env::var("GATEWAY_ALLOWED_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:5173".to_string());

        let otel_endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .filter(|s| !s.is_empty());

        let inference = InferenceConfig::from_env()?;

        Ok(Self {
            environment,
            ws_addr,
            allowed_origin,
            otel_endpoint,
            inference,
        })
    }
}
