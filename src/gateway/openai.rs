use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{Result, agent_error::AgentError},
    gateway::{GenerationRequest, TextGateway},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiGatewayConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl Default for OpenAiGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            api_key: String::new(),
            model: "llama3.2".to_string(),
        }
    }
}

impl OpenAiGatewayConfig {
    /// Reads `OPENAI_BASE_URL`, `OPENAI_API_KEY` and `OPENAI_MODEL`, keeping
    /// defaults for whatever is unset. An empty key is fine for local backends.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or(defaults.api_key),
            model: std::env::var("OPENAI_MODEL").unwrap_or(defaults.model),
        }
    }
}

/// Gateway for any backend speaking the OpenAI chat-completions protocol.
pub struct OpenAiGateway {
    client: Client,
    config: OpenAiGatewayConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiGateway {
    pub fn new(config: OpenAiGatewayConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &OpenAiGatewayConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

impl Default for OpenAiGateway {
    fn default() -> Self {
        Self::new(OpenAiGatewayConfig::default())
    }
}

#[async_trait]
impl TextGateway for OpenAiGateway {
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        debug!(
            "{} request to {} ({} max tokens)",
            request.stage, self.config.model, request.max_output_tokens
        );

        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system_instruction,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_content,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_output_tokens,
        };

        let mut builder = self.client.post(self.endpoint()).json(&body);
        if !self.config.api_key.is_empty() {
            builder = builder.bearer_auth(&self.config.api_key);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AgentError::GatewayError(format!("{}: {}", status, detail)).into());
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AgentError::GatewayError("response carried no choices".into()).into())
    }
}
