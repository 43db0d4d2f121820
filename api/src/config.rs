//! Process configuration, read from the environment (and an optional `.env`).

use anyhow::{Context, Result};
use answer_service::{AnswerBackendConfig, Link};
use std::net::SocketAddr;
use std::time::Duration;

use crate::query_payload::ValidationPolicy;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Which origins may call the gateway from a browser.
#[derive(Debug, Clone, PartialEq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorsConfig {
    pub origins: AllowedOrigins,
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: AllowedOrigins::Any,
            allow_credentials: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    pub addr: SocketAddr,
    /// Request body cap in bytes; `None` leaves bodies unbounded.
    pub max_body_bytes: Option<usize>,
    pub root_policy: ValidationPolicy,
    pub query_policy: ValidationPolicy,
    pub cors: CorsConfig,
    pub backend: AnswerBackendConfig,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let addr = get("GATEWAY_ADDR")
            .unwrap_or_else(|| DEFAULT_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("GATEWAY_ADDR is not a valid socket address")?;

        let max_body_bytes = match get("MAX_BODY_BYTES") {
            Some(v) => {
                let max = v
                    .trim()
                    .parse::<usize>()
                    .context("MAX_BODY_BYTES must be a whole number of bytes")?;
                if max == 0 {
                    return Err(anyhow::anyhow!(
                        "MAX_BODY_BYTES must be at least 1; unset it for no limit"
                    ));
                }
                Some(max)
            }
            None => None,
        };

        let root_policy = match get("ROOT_VALIDATION") {
            Some(v) => v.parse::<ValidationPolicy>().context("invalid ROOT_VALIDATION")?,
            None => ValidationPolicy::Strict,
        };
        let query_policy = match get("QUERY_VALIDATION") {
            Some(v) => v.parse::<ValidationPolicy>().context("invalid QUERY_VALIDATION")?,
            None => ValidationPolicy::Permissive,
        };

        let origins = match get("CORS_ALLOWED_ORIGINS") {
            None => AllowedOrigins::Any,
            Some(v) => {
                let list: Vec<String> = v
                    .split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect();
                // A `*` anywhere in the list widens it to every origin.
                if list.iter().any(|o| o == "*") {
                    AllowedOrigins::Any
                } else {
                    AllowedOrigins::List(list)
                }
            }
        };
        let allow_credentials = match get("CORS_ALLOW_CREDENTIALS") {
            Some(v) => parse_bool(&v).context("invalid CORS_ALLOW_CREDENTIALS")?,
            None => true,
        };

        let backend = match get("ANSWER_BACKEND")
            .map(|v| v.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("http") => {
                let url = get("ANSWER_SERVICE_URL").ok_or_else(|| {
                    anyhow::anyhow!("ANSWER_SERVICE_URL environment variable not set")
                })?;
                let timeout = match get("ANSWER_SERVICE_TIMEOUT_SECS") {
                    Some(v) => {
                        let secs = v
                            .trim()
                            .parse::<u64>()
                            .context("ANSWER_SERVICE_TIMEOUT_SECS must be a whole number of seconds")?;
                        if secs == 0 {
                            return Err(anyhow::anyhow!(
                                "ANSWER_SERVICE_TIMEOUT_SECS must be at least 1; unset it to disable the timeout"
                            ));
                        }
                        Some(Duration::from_secs(secs))
                    }
                    None => None,
                };
                AnswerBackendConfig::Http { url, timeout }
            }
            Some("static") => {
                let links: Vec<Link> = match get("STATIC_LINKS") {
                    Some(v) => serde_json::from_str(&v)
                        .context("STATIC_LINKS must be a JSON array of {text, url}")?,
                    None => Vec::new(),
                };
                AnswerBackendConfig::Static {
                    answer: get("STATIC_ANSWER").unwrap_or_default(),
                    links,
                }
            }
            Some(other) => {
                return Err(anyhow::anyhow!(
                    "unknown ANSWER_BACKEND '{}', expected 'http' or 'static'",
                    other
                ))
            }
        };

        Ok(Self {
            addr,
            max_body_bytes,
            root_policy,
            query_policy,
            cors: CorsConfig {
                origins,
                allow_credentials,
            },
            backend,
        })
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!("expected a boolean, got '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<GatewayConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GatewayConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_with_only_backend_url() {
        let config = load(&[("ANSWER_SERVICE_URL", "http://answers:8000/answer")]).unwrap();

        assert_eq!(config.addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.max_body_bytes, None);
        assert_eq!(config.root_policy, ValidationPolicy::Strict);
        assert_eq!(config.query_policy, ValidationPolicy::Permissive);
        assert_eq!(config.cors, CorsConfig::default());
        assert_eq!(
            config.backend,
            AnswerBackendConfig::Http {
                url: "http://answers:8000/answer".to_string(),
                timeout: None,
            }
        );
    }

    #[test]
    fn http_backend_requires_url() {
        let err = load(&[]).unwrap_err();
        assert!(err.to_string().contains("ANSWER_SERVICE_URL"));
    }

    #[test]
    fn overrides_are_applied() {
        let config = load(&[
            ("GATEWAY_ADDR", "127.0.0.1:8080"),
            ("MAX_BODY_BYTES", "10485760"),
            ("ROOT_VALIDATION", "permissive"),
            ("QUERY_VALIDATION", "Strict"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
            ("CORS_ALLOW_CREDENTIALS", "false"),
            ("ANSWER_SERVICE_URL", "http://answers/answer"),
            ("ANSWER_SERVICE_TIMEOUT_SECS", "30"),
        ])
        .unwrap();

        assert_eq!(config.addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.max_body_bytes, Some(10 * 1024 * 1024));
        assert_eq!(config.root_policy, ValidationPolicy::Permissive);
        assert_eq!(config.query_policy, ValidationPolicy::Strict);
        assert_eq!(
            config.cors,
            CorsConfig {
                origins: AllowedOrigins::List(vec![
                    "https://a.example".to_string(),
                    "https://b.example".to_string(),
                ]),
                allow_credentials: false,
            }
        );
        assert_eq!(
            config.backend,
            AnswerBackendConfig::Http {
                url: "http://answers/answer".to_string(),
                timeout: Some(Duration::from_secs(30)),
            }
        );
    }

    #[test]
    fn wildcard_origin_means_any() {
        let url = ("ANSWER_SERVICE_URL", "http://answers/answer");
        for origins in ["*", " * ", "https://a.example, *"] {
            let config = load(&[url, ("CORS_ALLOWED_ORIGINS", origins)]).unwrap();
            assert_eq!(config.cors.origins, AllowedOrigins::Any, "{origins}");
        }
    }

    #[test]
    fn static_backend_reads_answer_and_links() {
        let config = load(&[
            ("ANSWER_BACKEND", "static"),
            ("STATIC_ANSWER", "Try turning it off and on."),
            (
                "STATIC_LINKS",
                r#"[{"text":"FAQ","url":"https://example.com/faq"}]"#,
            ),
        ])
        .unwrap();

        assert_eq!(
            config.backend,
            AnswerBackendConfig::Static {
                answer: "Try turning it off and on.".to_string(),
                links: vec![Link::new("FAQ", "https://example.com/faq")],
            }
        );
    }

    #[test]
    fn bad_values_are_rejected() {
        let url = ("ANSWER_SERVICE_URL", "http://answers/answer");
        assert!(load(&[url, ("GATEWAY_ADDR", "not-an-addr")]).is_err());
        assert!(load(&[url, ("ROOT_VALIDATION", "lenient")]).is_err());
        assert!(load(&[url, ("CORS_ALLOW_CREDENTIALS", "maybe")]).is_err());
        assert!(load(&[url, ("ANSWER_SERVICE_TIMEOUT_SECS", "soon")]).is_err());
        assert!(load(&[url, ("ANSWER_SERVICE_TIMEOUT_SECS", "0")]).is_err());
        assert!(load(&[url, ("MAX_BODY_BYTES", "lots")]).is_err());
        assert!(load(&[url, ("MAX_BODY_BYTES", "0")]).is_err());
        assert!(load(&[("ANSWER_BACKEND", "gemini")]).is_err());
        assert!(load(&[("ANSWER_BACKEND", "static"), ("STATIC_LINKS", "{}")]).is_err());
    }
}
