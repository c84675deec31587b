use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    agent::{
        execution::fallback,
        planning::Plan,
        response::{Staged, parse_structured},
    },
    error::agent_error::AgentError,
    gateway::{GenerationRequest, GenerationStage, TextGateway, generate_or_marker},
    prompt::builder::{build_parameter_content, build_parameter_instruction},
    shared::OrchestratorConfig,
    tools::{Arguments, CapabilityDescriptor},
};

/// Resolves a concrete argument map for one capability: first by asking the
/// model for structured parameters, then by pattern matching the task.
pub struct ParameterExtractor {
    gateway: Arc<dyn TextGateway>,
    config: OrchestratorConfig,
}

impl ParameterExtractor {
    pub fn new(gateway: Arc<dyn TextGateway>, config: OrchestratorConfig) -> Self {
        Self { gateway, config }
    }

    /// Never fails. `Parsed` carries the model's arguments verbatim,
    /// `Degraded` the pattern-matched ones (possibly empty).
    pub async fn extract(
        &self,
        descriptor: &CapabilityDescriptor,
        task: &str,
        plan: &Plan,
    ) -> Staged<Arguments> {
        match self.structured(descriptor, task, plan).await {
            Ok(arguments) => {
                debug!(
                    "Structured parameters for {}: {:?}",
                    descriptor.name,
                    arguments.keys().collect::<Vec<_>>()
                );
                Staged::Parsed(arguments)
            }
            Err(e) => {
                warn!(
                    "Structured parameters for {} unavailable ({}), using pattern fallback",
                    descriptor.name, e
                );
                Staged::Degraded(fallback::extract(descriptor, task, &self.config))
            }
        }
    }

    async fn structured(
        &self,
        descriptor: &CapabilityDescriptor,
        task: &str,
        plan: &Plan,
    ) -> Result<Arguments, AgentError> {
        let request = GenerationRequest::new(
            GenerationStage::ParameterExtraction,
            build_parameter_instruction(descriptor),
            build_parameter_content(task, &descriptor.name, plan),
        )
        .with_max_output_tokens(self.config.limits.parameter_extraction)
        .with_temperature(self.config.extraction_temperature);

        let raw = generate_or_marker(self.gateway.as_ref(), request).await;
        match parse_structured(&raw)? {
            Value::Object(arguments) => Ok(arguments),
            other => Err(AgentError::ParseError(format!(
                "parameters were not an object: {}",
                other
            ))),
        }
    }
}
