use async_trait::async_trait;

use crate::{
    error::Result,
    tools::model::{Arguments, CapabilityDescriptor, ExecutionResult, ParameterSpec},
};

/// The contract every pluggable action satisfies. The orchestrator only ever
/// calls `execute`; the descriptor feeds prompts and parameter extraction.
///
/// An `Err` from `execute` (or a panic) is converted into a failed
/// [`ExecutionResult`] by the registry, so implementations may use `?` freely.
#[async_trait]
pub trait Capability: Send + Sync {
    fn descriptor(&self) -> &CapabilityDescriptor;

    fn name(&self) -> &str {
        &self.descriptor().name
    }

    fn description(&self) -> &str {
        &self.descriptor().description
    }

    fn parameters(&self) -> &[ParameterSpec] {
        &self.descriptor().parameters
    }

    async fn execute(&self, arguments: Arguments) -> Result<ExecutionResult>;
}
