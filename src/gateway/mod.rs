pub mod openai;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

pub use openai::{OpenAiGateway, OpenAiGatewayConfig};

/// Prefix of the text produced in place of a reply when a generation call fails.
pub const ERROR_MARKER: &str = "Error calling LLM:";

/// Which stage issued a generation call. Backends may use it for logging;
/// it never changes the request semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenerationStage {
    Reasoning,
    ToolSelection,
    ParameterExtraction,
    DirectAnswer,
    Reflection,
    Critique,
    Content,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationStage::Reasoning => write!(f, "reasoning"),
            GenerationStage::ToolSelection => write!(f, "tool_selection"),
            GenerationStage::ParameterExtraction => write!(f, "parameter_extraction"),
            GenerationStage::DirectAnswer => write!(f, "direct_answer"),
            GenerationStage::Reflection => write!(f, "reflection"),
            GenerationStage::Critique => write!(f, "critique"),
            GenerationStage::Content => write!(f, "content"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub stage: GenerationStage,
    pub system_instruction: String,
    pub user_content: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl GenerationRequest {
    pub fn new(
        stage: GenerationStage,
        system_instruction: impl Into<String>,
        user_content: impl Into<String>,
    ) -> Self {
        Self {
            stage,
            system_instruction: system_instruction.into(),
            user_content: user_content.into(),
            max_output_tokens: 2000,
            temperature: 0.7,
        }
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Prompt in, text out. Hides every provider-specific request shape.
#[async_trait]
pub trait TextGateway: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String>;
}

/// Wraps a closure as a gateway. Handy for custom backends and scripted tests.
pub struct FnGateway<F> {
    handler: F,
}

impl<F> FnGateway<F>
where
    F: Fn(&GenerationRequest) -> Result<String> + Send + Sync,
{
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl<F> TextGateway for FnGateway<F>
where
    F: Fn(&GenerationRequest) -> Result<String> + Send + Sync,
{
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        (self.handler)(&request)
    }
}

/// Calls the gateway and folds a failure into marker text, so callers only
/// ever see a string and let the parser pick the degraded path.
pub async fn generate_or_marker(gateway: &dyn TextGateway, request: GenerationRequest) -> String {
    let stage = request.stage;
    match gateway.generate(request).await {
        Ok(text) => text,
        Err(e) => {
            warn!("{} generation failed: {}", stage, e);
            format!("{} {}", ERROR_MARKER, e)
        }
    }
}

pub fn is_error_text(text: &str) -> bool {
    text.starts_with(ERROR_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, agent_error::AgentError};

    #[tokio::test]
    async fn failure_becomes_marker_text() {
        let gateway = FnGateway::new(|_: &GenerationRequest| {
            Err(Error::AgentError(AgentError::GatewayError("offline".into())))
        });
        let text = generate_or_marker(
            &gateway,
            GenerationRequest::new(GenerationStage::Reasoning, "sys", "user"),
        )
        .await;
        assert!(is_error_text(&text));
        assert!(text.contains("offline"));
    }

    #[tokio::test]
    async fn success_passes_through() {
        let gateway = FnGateway::new(|req: &GenerationRequest| Ok(req.user_content.to_uppercase()));
        let text = generate_or_marker(
            &gateway,
            GenerationRequest::new(GenerationStage::DirectAnswer, "sys", "hi"),
        )
        .await;
        assert_eq!(text, "HI");
    }
}
