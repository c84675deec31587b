use serde::{Deserialize, Serialize};

use crate::agent::response::lenient;

/// Structured plan produced once per task by the reasoning stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default, deserialize_with = "lenient::text")]
    pub understanding: String,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub steps: Vec<String>,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub tools_needed: Vec<String>,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub potential_challenges: Vec<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub execution_plan: String,
}

impl Plan {
    /// Fallback when the reply was not structured: keep the raw text so the
    /// plan still says something, with every list empty.
    pub fn degraded(raw: &str) -> Self {
        Self {
            understanding: raw.to_string(),
            execution_plan: raw.to_string(),
            ..Default::default()
        }
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}
