use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Output-token limits per generation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageLimits {
    pub reasoning: u32,
    pub tool_selection: u32,
    pub parameter_extraction: u32,
    pub direct_answer: u32,
    pub reflection: u32,
}

impl Default for StageLimits {
    fn default() -> Self {
        Self {
            reasoning: 2000,
            tool_selection: 2000,
            parameter_extraction: 500,
            direct_answer: 1000,
            reflection: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub assistant_name: String,
    /// Canned reply for self-referential questions.
    pub identity: String,
    pub identity_short_circuit: bool,
    pub temperature: f32,
    /// Parameter extraction runs cooler than the other stages.
    pub extraction_temperature: f32,
    pub limits: StageLimits,
    pub report_dir: PathBuf,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        let assistant_name = "Agentloop Assistant".to_string();
        let identity = format!(
            "I am {}, an autonomous assistant. I reason about your task, pick the \
             capabilities it needs (knowledge retrieval, content generation, email), run \
             them, critique the outcome and score my own performance.",
            assistant_name
        );
        Self {
            assistant_name,
            identity,
            identity_short_circuit: true,
            temperature: 0.7,
            extraction_temperature: 0.3,
            limits: StageLimits::default(),
            report_dir: PathBuf::from("logs"),
        }
    }
}

impl OrchestratorConfig {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = dir.into();
        self
    }

    pub fn without_identity_short_circuit(mut self) -> Self {
        self.identity_short_circuit = false;
        self
    }
}
