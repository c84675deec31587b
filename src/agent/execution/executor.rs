use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::{
    agent::{execution::params::ParameterExtractor, planning::Plan},
    gateway::{GenerationRequest, GenerationStage, TextGateway, generate_or_marker},
    prompt::builder::build_direct_answer_instruction,
    shared::OrchestratorConfig,
    tools::{Arguments, CapabilityRegistry, DIRECT_ANSWER, ExecutionRecord, ExecutionResult},
};

/// Runs the selected capabilities one at a time, in selection order.
pub struct Executor {
    gateway: Arc<dyn TextGateway>,
    config: OrchestratorConfig,
    extractor: ParameterExtractor,
}

impl Executor {
    pub fn new(gateway: Arc<dyn TextGateway>, config: OrchestratorConfig) -> Self {
        let extractor = ParameterExtractor::new(gateway.clone(), config.clone());
        Self {
            gateway,
            config,
            extractor,
        }
    }

    pub async fn run(
        &self,
        registry: &CapabilityRegistry,
        selected: &[String],
        task: &str,
        plan: &Plan,
    ) -> Vec<ExecutionRecord> {
        let mut records = Vec::with_capacity(selected.len());
        for name in selected {
            info!("Using capability {}", name);
            let arguments = match registry.descriptor(name) {
                Some(descriptor) => {
                    self.extractor.extract(descriptor, task, plan).await.into_inner()
                }
                None => Arguments::new(),
            };

            let result = registry.dispatch(name, arguments).await;
            if result.success {
                info!("Capability {} succeeded", name);
            } else {
                warn!(
                    "Capability {} failed: {}",
                    name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            records.push(ExecutionRecord::new(name.clone(), result));
        }
        records
    }

    /// Answers the task without any capability. Always successful: a failed
    /// generation call turns into the answer text itself.
    pub async fn direct_answer(&self, task: &str) -> ExecutionRecord {
        info!("No capability needed, answering directly");
        let request = GenerationRequest::new(
            GenerationStage::DirectAnswer,
            build_direct_answer_instruction(&self.config.assistant_name),
            task,
        )
        .with_max_output_tokens(self.config.limits.direct_answer)
        .with_temperature(self.config.temperature);

        let answer = generate_or_marker(self.gateway.as_ref(), request).await;
        ExecutionRecord::new(DIRECT_ANSWER, ExecutionResult::success(Value::String(answer)))
    }
}
