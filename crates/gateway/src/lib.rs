pub mod config;
pub mod protocol;
pub mod session;
pub mod socketio;
pub mod state;
pub mod ws;

pub use config::GatewayConfig;
pub use state::AppState;
pub use ws::{router, run_server};
