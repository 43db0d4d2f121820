use crate::models::*;
use crate::service::AnswerService;
use anyhow::Result;
use reqwest::Client;
use std::time::Duration;

/// Forwards questions to a remote answer backend over JSON/HTTP.
pub struct HttpAnswerService {
    client: Client,
    url: String,
}

impl HttpAnswerService {
    /// Without a timeout a stalled backend stalls the caller.
    pub fn new(url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            url: url.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl AnswerService for HttpAnswerService {
    async fn get_relevant_answer(&self, question: &str, image: Option<&str>) -> Result<AnswerResult> {
        let request = AnswerRequest {
            question: question.to_string(),
            image: image.map(str::to_string),
        };

        let response = self.client
            .post(&self.url)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(anyhow::anyhow!("Answer backend error ({}): {}", status, error_text));
        }

        let result: AnswerResult = response.json().await?;
        log::info!("Answer backend returned {} links", result.links.len());

        Ok(result)
    }
}
