use answer_service::{AnswerResult, Link};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct AnswerResponse {
    pub answer: String,
    pub links: Vec<Link>,
}

impl From<AnswerResult> for AnswerResponse {
    fn from(result: AnswerResult) -> Self {
        Self {
            answer: result.answer,
            links: result.links,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
