pub mod models;
pub mod service;
pub mod http_service;
pub mod static_service;

pub use models::*;
pub use service::{create_answer_service, AnswerBackendConfig, AnswerService};
pub use http_service::HttpAnswerService;
pub use static_service::StaticAnswerService;
