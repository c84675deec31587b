pub mod critique;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    agent::{
        reasoner::Reasoner,
        response::{Staged, lenient, parse_object},
    },
    gateway::{GenerationRequest, GenerationStage},
    prompt::builder::{build_reflection_content, build_reflection_instruction},
    tools::ExecutionRecord,
};

pub use critique::Critique;

/// Self-critique of one task. `success` is always the ground truth computed
/// from the execution records, never the model's opinion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reflection {
    /// Any self-reported value in the reply is ignored.
    #[serde(default, skip_deserializing)]
    pub success: bool,

    #[serde(default, deserialize_with = "lenient::text")]
    pub analysis: String,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub strengths: Vec<String>,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub weaknesses: Vec<String>,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub next_steps: Vec<String>,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub lessons_learned: Vec<String>,

    #[serde(
        default,
        deserialize_with = "lenient::optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub alternative_approach: Option<String>,
}

impl Reflection {
    pub fn degraded(raw: &str, success: bool) -> Self {
        Self {
            success,
            analysis: raw.to_string(),
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            next_steps: Vec::new(),
            lessons_learned: Vec::new(),
            alternative_approach: None,
        }
    }
}

impl Reasoner {
    pub async fn reflect(
        &mut self,
        action_taken: &str,
        records: &[ExecutionRecord],
        expected_outcome: Option<&str>,
        actual_success: bool,
    ) -> Staged<Reflection> {
        let request = GenerationRequest::new(
            GenerationStage::Reflection,
            build_reflection_instruction(actual_success),
            build_reflection_content(action_taken, records, expected_outcome),
        )
        .with_max_output_tokens(self.config.limits.reflection)
        .with_temperature(self.config.temperature);

        let raw = self.generate(request).await;
        let staged = match parse_object::<Reflection>(&raw) {
            Ok(reflection) => Staged::Parsed(reflection),
            Err(e) => {
                warn!("Reflection reply unusable, degrading: {}", e);
                Staged::Degraded(Reflection::degraded(&raw, actual_success))
            }
        }
        .map(|mut reflection| {
            reflection.success = actual_success;
            reflection
        });

        info!(
            "Reflection recorded (success: {}, {} next step(s))",
            actual_success,
            staged.value().next_steps.len()
        );
        self.log.record_reflection(action_taken, staged.value());
        staged
    }
}
