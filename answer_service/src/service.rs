//! The answer-service seam and its backend factory.

use crate::http_service::HttpAnswerService;
use crate::models::*;
use crate::static_service::StaticAnswerService;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

/// Answers a question, optionally with an image reference, and returns the
/// answer text together with its supporting links.
///
/// Callers treat implementations as a black box; the image reference is
/// passed through untouched.
#[async_trait::async_trait]
pub trait AnswerService: Send + Sync {
    async fn get_relevant_answer(&self, question: &str, image: Option<&str>) -> Result<AnswerResult>;
}

/// Which backend the gateway talks to.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerBackendConfig {
    Http {
        url: String,
        timeout: Option<Duration>,
    },
    Static {
        answer: String,
        links: Vec<Link>,
    },
}

pub fn create_answer_service(config: &AnswerBackendConfig) -> Result<Arc<dyn AnswerService>> {
    match config {
        AnswerBackendConfig::Http { url, timeout } => {
            log::info!("Using remote answer backend at {}", url);
            Ok(Arc::new(HttpAnswerService::new(url, *timeout)?))
        }
        AnswerBackendConfig::Static { answer, links } => {
            log::info!("Using static answer backend ({} links)", links.len());
            Ok(Arc::new(StaticAnswerService::new(answer.clone(), links.clone())))
        }
    }
}
