use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

use crate::error::GatewayError;

/// How strictly a route validates its JSON body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// `question` must be present and a string.
    Strict,
    /// A missing or null `question` becomes `""`.
    Permissive,
}

impl FromStr for ValidationPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "permissive" => Ok(Self::Permissive),
            other => Err(anyhow::anyhow!(
                "unknown validation policy '{}', expected 'strict' or 'permissive'",
                other
            )),
        }
    }
}

/// The validated question handed to the answer service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPayload {
    pub question: String,
    pub image: Option<String>,
}

#[derive(Deserialize)]
struct StrictBody {
    question: String,
    #[serde(default)]
    image: Option<String>,
}

#[derive(Deserialize)]
struct PermissiveBody {
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

impl ValidationPolicy {
    /// Parses a raw request body. Content-Type is not consulted.
    pub fn parse(self, body: &[u8]) -> Result<QueryPayload, GatewayError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| GatewayError::MalformedJson(e.to_string()))?;

        if !value.is_object() {
            return Err(GatewayError::Validation(
                "request body must be a JSON object".to_string(),
            ));
        }

        let invalid = |e: serde_json::Error| GatewayError::Validation(e.to_string());

        match self {
            Self::Strict => {
                let body: StrictBody = serde_json::from_value(value).map_err(invalid)?;
                Ok(QueryPayload {
                    question: body.question,
                    image: body.image,
                })
            }
            Self::Permissive => {
                let body: PermissiveBody = serde_json::from_value(value).map_err(invalid)?;
                Ok(QueryPayload {
                    question: body.question.unwrap_or_default(),
                    image: body.image,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(question: &str, image: Option<&str>) -> QueryPayload {
        QueryPayload {
            question: question.to_string(),
            image: image.map(str::to_string),
        }
    }

    #[test]
    fn strict_accepts_question_with_and_without_image() {
        let policy = ValidationPolicy::Strict;
        assert_eq!(
            policy.parse(br#"{"question":"hi"}"#).unwrap(),
            payload("hi", None)
        );
        assert_eq!(
            policy.parse(br#"{"question":"hi","image":null}"#).unwrap(),
            payload("hi", None)
        );
        assert_eq!(
            policy
                .parse(br#"{"question":"hi","image":"data:image/png;base64,AAAA"}"#)
                .unwrap(),
            payload("hi", Some("data:image/png;base64,AAAA"))
        );
    }

    #[test]
    fn strict_rejects_missing_or_null_question() {
        for body in [&br#"{}"#[..], br#"{"image":"x"}"#, br#"{"question":null}"#] {
            let err = ValidationPolicy::Strict.parse(body).unwrap_err();
            assert!(matches!(err, GatewayError::Validation(_)), "{err:?}");
        }
    }

    #[test]
    fn permissive_defaults_missing_fields() {
        let policy = ValidationPolicy::Permissive;
        assert_eq!(policy.parse(b"{}").unwrap(), payload("", None));
        assert_eq!(
            policy.parse(br#"{"question":null,"image":null}"#).unwrap(),
            payload("", None)
        );
        assert_eq!(
            policy.parse(br#"{"image":"img-7"}"#).unwrap(),
            payload("", Some("img-7"))
        );
    }

    #[test]
    fn wrong_types_are_validation_errors_under_both_policies() {
        for policy in [ValidationPolicy::Strict, ValidationPolicy::Permissive] {
            for body in [
                &br#"{"question":42}"#[..],
                br#"{"question":"q","image":7}"#,
                br#"{"question":["q"]}"#,
            ] {
                let err = policy.parse(body).unwrap_err();
                assert!(matches!(err, GatewayError::Validation(_)), "{policy:?}: {err:?}");
            }
        }
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        for body in [&b"[]"[..], b"\"question\"", b"null", br#"["q", null]"#] {
            let err = ValidationPolicy::Permissive.parse(body).unwrap_err();
            assert!(matches!(err, GatewayError::Validation(_)), "{err:?}");
        }
    }

    #[test]
    fn malformed_json_is_its_own_error() {
        for body in [&b""[..], b"{", b"question=hi"] {
            let err = ValidationPolicy::Strict.parse(body).unwrap_err();
            assert!(matches!(err, GatewayError::MalformedJson(_)), "{err:?}");
        }
    }

    #[test]
    fn unknown_fields_are_ignored() {
        assert_eq!(
            ValidationPolicy::Strict
                .parse(br#"{"question":"q","top_k":3}"#)
                .unwrap(),
            payload("q", None)
        );
    }

    #[test]
    fn policy_names_parse_case_insensitively() {
        assert_eq!("STRICT".parse::<ValidationPolicy>().unwrap(), ValidationPolicy::Strict);
        assert_eq!(
            " permissive ".parse::<ValidationPolicy>().unwrap(),
            ValidationPolicy::Permissive
        );
        assert!("lenient".parse::<ValidationPolicy>().is_err());
    }
}
