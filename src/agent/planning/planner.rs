use tracing::{info, warn};

use crate::{
    agent::{
        planning::Plan,
        reasoner::Reasoner,
        response::{Staged, parse_object},
    },
    gateway::{GenerationRequest, GenerationStage},
    prompt::builder::{build_reasoning_content, build_reasoning_instruction},
};

impl Reasoner {
    /// Turns a task into a [`Plan`]. Never fails; an unparseable reply yields
    /// [`Plan::degraded`]. Every plan is appended to the reasoning log.
    pub async fn think(&mut self, task: &str, context: Option<&str>) -> Staged<Plan> {
        let request = GenerationRequest::new(
            GenerationStage::Reasoning,
            build_reasoning_instruction(),
            build_reasoning_content(task, context),
        )
        .with_max_output_tokens(self.config.limits.reasoning)
        .with_temperature(self.config.temperature);

        let raw = self.generate(request).await;
        let staged = match parse_object::<Plan>(&raw) {
            Ok(plan) => Staged::Parsed(plan),
            Err(e) => {
                warn!("Reasoning reply unusable, degrading plan: {}", e);
                Staged::Degraded(Plan::degraded(&raw))
            }
        };

        info!("Plan ready with {} step(s)", staged.value().step_count());
        self.log.record_reasoning(task, staged.value());
        staged
    }
}
