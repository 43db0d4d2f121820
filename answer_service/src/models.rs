use serde::{Deserialize, Serialize};

/// A citation surfaced to the user next to an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub url: String,
}

impl Link {
    pub fn new(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: url.into(),
        }
    }
}

/// What the answer service hands back for one question.
///
/// `links` keeps the order the service produced; it may encode relevance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub answer: String,
    pub links: Vec<Link>,
}

impl AnswerResult {
    pub fn new(answer: impl Into<String>, links: Vec<Link>) -> Self {
        Self {
            answer: answer.into(),
            links,
        }
    }

    /// Position of the first link with an empty url, if any.
    pub fn first_link_without_url(&self) -> Option<usize> {
        self.links.iter().position(|link| link.url.is_empty())
    }
}

/// Body sent to a remote answer backend.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub question: String,
    pub image: Option<String>,
}
