//! Decision model gateway over `POST /chat/completions`
//!
//! The API is stateless, so a session only remembers its system prompt and
//! model settings. Each `send` is a fresh two-message exchange.

use super::endpoint::{HttpFailure, ProviderEndpoint};
use super::types::{ChatMessage, ChatRequest, ChatResponse};
use async_trait::async_trait;
use review_application::{GatewayError, LlmGateway, LlmSession};
use review_domain::ModelSpec;
use tracing::{debug, warn};

pub struct OpenAiChatGateway {
    endpoint: ProviderEndpoint,
}

impl OpenAiChatGateway {
    pub fn new(endpoint: ProviderEndpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl LlmGateway for OpenAiChatGateway {
    async fn create_session_with_system_prompt(
        &self,
        model: &ModelSpec,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        if model.name.trim().is_empty() {
            return Err(GatewayError::ModelNotAvailable(
                "model name is empty".to_string(),
            ));
        }

        Ok(Box::new(OpenAiChatSession {
            endpoint: self.endpoint.clone(),
            model: model.clone(),
            system_prompt: system_prompt.to_string(),
        }))
    }
}

pub struct OpenAiChatSession {
    endpoint: ProviderEndpoint,
    model: ModelSpec,
    system_prompt: String,
}

impl OpenAiChatSession {
    fn request<'a>(&'a self, content: &'a str) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if !self.system_prompt.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: &self.system_prompt,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content,
        });

        ChatRequest {
            model: &self.model.name,
            messages,
            temperature: self.model.temperature,
            max_tokens: self.model.max_output_tokens,
        }
    }
}

/// Text of the first choice.
///
/// Missing content comes back as an empty string for the response parser
/// to reject.
fn first_choice_text(response: ChatResponse, model: &str) -> Result<String, GatewayError> {
    let choice = response.choices.into_iter().next().ok_or_else(|| {
        GatewayError::InvalidResponse("response contained no choices".to_string())
    })?;

    if choice.finish_reason.as_deref() == Some("length") {
        warn!(model = %model, "Model output hit the token limit and may be truncated");
    }

    let text = choice.message.content.unwrap_or_default();
    if text.trim().is_empty() {
        warn!(model = %model, "Model returned empty content");
    }
    Ok(text)
}

fn gateway_error(failure: HttpFailure, model: &str) -> GatewayError {
    match &failure {
        HttpFailure::Connect { .. } => GatewayError::ConnectionError(failure.to_string()),
        HttpFailure::Timeout { .. } => GatewayError::Timeout,
        HttpFailure::Status { status: 404, .. } => {
            GatewayError::ModelNotAvailable(format!("{} ({})", model, failure))
        }
        HttpFailure::Status {
            status: 408 | 504, ..
        } => GatewayError::Timeout,
        HttpFailure::Status { .. } => GatewayError::RequestFailed(failure.to_string()),
        HttpFailure::Decode { .. } => GatewayError::InvalidResponse(failure.to_string()),
    }
}

#[async_trait]
impl LlmSession for OpenAiChatSession {
    fn model(&self) -> &ModelSpec {
        &self.model
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        debug!(
            model = %self.model.name,
            prompt_chars = content.chars().count(),
            "Calling chat completions"
        );

        let response: ChatResponse = self
            .endpoint
            .post_json("chat/completions", &self.request(content))
            .await
            .map_err(|e| gateway_error(e, &self.model.name))?;

        first_choice_text(response, &self.model.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session(system_prompt: &str) -> OpenAiChatSession {
        OpenAiChatSession {
            endpoint: ProviderEndpoint::new("http://localhost:1/v1/", None).unwrap(),
            model: ModelSpec::new("gemini-1.5-flash")
                .with_temperature(0.0)
                .with_max_output_tokens(256),
            system_prompt: system_prompt.to_string(),
        }
    }

    #[test]
    fn test_request_body() {
        let session = session("You review tasks.");
        let body = serde_json::to_value(session.request("Task T-1")).unwrap();

        assert_eq!(
            body,
            json!({
                "model": "gemini-1.5-flash",
                "messages": [
                    {"role": "system", "content": "You review tasks."},
                    {"role": "user", "content": "Task T-1"}
                ],
                "temperature": 0.0,
                "max_tokens": 256
            })
        );
    }

    #[test]
    fn test_request_without_system_prompt() {
        let session = session("");
        let body = serde_json::to_value(session.request("hi")).unwrap();
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
    }

    #[test]
    fn test_first_choice_text() {
        let response: ChatResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "{\"decision\": \"reject\"}"},
                "finish_reason": "stop"
            }]
        }))
        .unwrap();

        let text = first_choice_text(response, "m").unwrap();
        assert_eq!(text, "{\"decision\": \"reject\"}");
    }

    #[test]
    fn test_no_choices_is_invalid() {
        let response: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(
            first_choice_text(response, "m"),
            Err(GatewayError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_empty_content_passed_through() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": ""}}]
        }))
        .unwrap();
        assert_eq!(first_choice_text(response, "m").unwrap(), "");

        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        }))
        .unwrap();
        assert_eq!(first_choice_text(response, "m").unwrap(), "");
    }

    #[test]
    fn test_gateway_error_mapping() {
        let status = |code: u16| HttpFailure::Status {
            url: "http://localhost/v1/chat/completions".to_string(),
            status: code,
            body: String::new(),
        };

        assert!(matches!(
            gateway_error(status(404), "m"),
            GatewayError::ModelNotAvailable(_)
        ));
        assert!(matches!(gateway_error(status(504), "m"), GatewayError::Timeout));
        assert!(matches!(
            gateway_error(status(500), "m"),
            GatewayError::RequestFailed(_)
        ));
        assert!(matches!(
            gateway_error(
                HttpFailure::Timeout {
                    url: "u".to_string()
                },
                "m"
            ),
            GatewayError::Timeout
        ));
    }

    #[tokio::test]
    async fn test_empty_model_name_rejected() {
        let gateway =
            OpenAiChatGateway::new(ProviderEndpoint::new("http://localhost:1/v1/", None).unwrap());
        let result = gateway
            .create_session_with_system_prompt(&ModelSpec::new(" "), "system")
            .await;
        assert!(matches!(result, Err(GatewayError::ModelNotAvailable(_))));
    }
}
