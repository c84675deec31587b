use std::sync::Arc;

use crate::{
    agent::memory::ReasoningLog,
    gateway::{GenerationRequest, TextGateway, generate_or_marker},
    shared::OrchestratorConfig,
};

/// Owns the generation-backed stages (reasoning, tool selection, reflection,
/// critique) and the reasoning log they append to. The stages themselves are
/// implemented next to their data types.
pub struct Reasoner {
    pub(crate) gateway: Arc<dyn TextGateway>,
    pub(crate) config: OrchestratorConfig,
    pub(crate) log: ReasoningLog,
}

impl Reasoner {
    pub fn new(gateway: Arc<dyn TextGateway>, config: OrchestratorConfig) -> Self {
        Self {
            gateway,
            config,
            log: ReasoningLog::default(),
        }
    }

    pub fn log(&self) -> &ReasoningLog {
        &self.log
    }

    pub(crate) async fn generate(&self, request: GenerationRequest) -> String {
        generate_or_marker(self.gateway.as_ref(), request).await
    }
}
