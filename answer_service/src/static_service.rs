use crate::models::*;
use crate::service::AnswerService;
use anyhow::Result;

/// Returns the same answer for every question. Handy for smoke runs of the
/// gateway without a real backend behind it.
pub struct StaticAnswerService {
    answer: String,
    links: Vec<Link>,
}

impl StaticAnswerService {
    pub fn new(answer: String, links: Vec<Link>) -> Self {
        Self { answer, links }
    }
}

#[async_trait::async_trait]
impl AnswerService for StaticAnswerService {
    async fn get_relevant_answer(&self, question: &str, image: Option<&str>) -> Result<AnswerResult> {
        log::debug!(
            "Static answer for question of {} chars (image: {})",
            question.chars().count(),
            image.is_some()
        );
        Ok(AnswerResult::new(self.answer.clone(), self.links.clone()))
    }
}
