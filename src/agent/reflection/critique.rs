use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    agent::{
        reasoner::Reasoner,
        response::{Staged, lenient, parse_object},
    },
    gateway::{GenerationRequest, GenerationStage},
    prompt::builder::{build_critique_content, build_critique_instruction},
};

pub const DEFAULT_CRITERIA: [&str; 5] = [
    "Relevance to the task",
    "Clarity and coherence",
    "Completeness",
    "Accuracy",
    "Professional quality",
];

fn neutral_score() -> f64 {
    0.7
}

fn meets_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Critique {
    #[serde(default = "neutral_score", deserialize_with = "lenient::unit_interval")]
    pub overall_score: f64,

    #[serde(default)]
    pub criteria_scores: BTreeMap<String, f64>,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub strengths: Vec<String>,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub improvements: Vec<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub revised_output: String,

    #[serde(default = "meets_by_default", deserialize_with = "lenient::flag")]
    pub meets_requirements: bool,
}

impl Default for Critique {
    fn default() -> Self {
        Self {
            overall_score: neutral_score(),
            criteria_scores: BTreeMap::new(),
            strengths: Vec::new(),
            improvements: Vec::new(),
            revised_output: String::new(),
            meets_requirements: meets_by_default(),
        }
    }
}

impl Reasoner {
    /// Grades a piece of generated output against `criteria`
    /// (or [`DEFAULT_CRITERIA`]).
    pub async fn critique_output(
        &self,
        task: &str,
        output: &str,
        criteria: Option<&[String]>,
    ) -> Staged<Critique> {
        let criteria: Vec<String> = match criteria {
            Some(list) if !list.is_empty() => list.to_vec(),
            _ => DEFAULT_CRITERIA.iter().map(|c| c.to_string()).collect(),
        };

        let request = GenerationRequest::new(
            GenerationStage::Critique,
            build_critique_instruction(&criteria),
            build_critique_content(task, output),
        )
        .with_max_output_tokens(self.config.limits.reflection)
        .with_temperature(self.config.temperature);

        let raw = self.generate(request).await;
        match parse_object::<Critique>(&raw) {
            Ok(critique) => Staged::Parsed(critique),
            Err(e) => {
                warn!("Critique reply unusable, using neutral critique: {}", e);
                Staged::Degraded(Critique::default())
            }
        }
    }
}
