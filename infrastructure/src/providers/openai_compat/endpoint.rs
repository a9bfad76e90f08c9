//! Shared HTTP plumbing for OpenAI-compatible APIs

use review_domain::core::string::truncate_chars;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = concat!("task-review/", env!("CARGO_PKG_VERSION"));

/// Longest error body kept in messages
const MAX_ERROR_BODY: usize = 500;

/// Transport-level failure, mapped onto each port's error type by the caller
#[derive(Debug, Error)]
pub enum HttpFailure {
    #[error("could not reach {url}: {message}")]
    Connect { url: String, message: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} returned HTTP {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("malformed response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Base URL, credentials and connection pool for one provider.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct ProviderEndpoint {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ProviderEndpoint {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, HttpFailure> {
        let base_url = base_url.into();
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| HttpFailure::Connect {
                url: base_url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    /// Build an endpoint whose API key is read from `api_key_env`.
    ///
    /// A missing variable is not an error: local servers usually need no key.
    pub fn from_env(base_url: impl Into<String>, api_key_env: &str) -> Result<Self, HttpFailure> {
        let api_key = std::env::var(api_key_env).ok();
        if api_key.is_none() {
            debug!("{} is not set; sending requests without credentials", api_key_env);
        }
        Self::new(base_url, api_key)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Full URL of `path` under the base URL
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// POST `body` as JSON to `path` and decode the JSON reply.
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, HttpFailure>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        let mut request = self.client.post(&url).json(body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| classify_send_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(url = %url, status = status.as_u16(), "Provider returned an error status");
            return Err(HttpFailure::Status {
                url,
                status: status.as_u16(),
                body: truncate_chars(text.trim(), MAX_ERROR_BODY).to_string(),
            });
        }

        response.json::<R>().await.map_err(|e| {
            if e.is_timeout() {
                HttpFailure::Timeout { url: url.clone() }
            } else {
                HttpFailure::Decode {
                    url: url.clone(),
                    message: e.to_string(),
                }
            }
        })
    }
}

fn classify_send_error(url: &str, e: reqwest::Error) -> HttpFailure {
    if e.is_timeout() {
        HttpFailure::Timeout {
            url: url.to_string(),
        }
    } else {
        HttpFailure::Connect {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let endpoint = ProviderEndpoint::new("https://api.example.com/v1/", None).unwrap();
        assert_eq!(
            endpoint.url("embeddings"),
            "https://api.example.com/v1/embeddings"
        );

        let endpoint = ProviderEndpoint::new("http://localhost:11434/v1", None).unwrap();
        assert_eq!(
            endpoint.url("/chat/completions"),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_blank_api_key_ignored() {
        let endpoint = ProviderEndpoint::new("http://localhost", Some("  ".to_string())).unwrap();
        assert!(!endpoint.has_api_key());

        let endpoint = ProviderEndpoint::new("http://localhost", Some("sk-test".to_string())).unwrap();
        assert!(endpoint.has_api_key());
    }

    #[test]
    fn test_from_env_missing_variable() {
        let endpoint =
            ProviderEndpoint::from_env("http://localhost", "TASK_REVIEW_TEST_UNSET_KEY_VAR")
                .unwrap();
        assert!(!endpoint.has_api_key());
    }

    #[tokio::test]
    async fn test_connection_refused_is_connect_failure() {
        // Bind then release a port so nothing is listening on it
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let endpoint = ProviderEndpoint::new(format!("http://{}/v1/", addr), None).unwrap();
        let result: Result<serde_json::Value, _> = endpoint
            .post_json("embeddings", &serde_json::json!({"input": "x"}))
            .await;

        assert!(matches!(result, Err(HttpFailure::Connect { .. })));
    }
}
