pub mod answer_response;
pub mod config;
pub mod cors;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod query_payload;
pub mod request_log;

pub use config::GatewayConfig;
pub use gateway::{AppState, Gateway};
pub use query_payload::ValidationPolicy;
