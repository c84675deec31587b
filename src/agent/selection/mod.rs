use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    agent::{
        reasoner::Reasoner,
        response::{Staged, lenient, parse_object},
    },
    gateway::{GenerationRequest, GenerationStage},
    prompt::builder::{build_selection_content, build_selection_instruction},
};

fn default_confidence() -> f64 {
    0.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSelection {
    /// Unique names in execution order.
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub selected_tools: Vec<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub reasoning: String,

    #[serde(default, deserialize_with = "lenient::text")]
    pub sequence: String,

    #[serde(default = "default_confidence", deserialize_with = "lenient::unit_interval")]
    pub confidence: f64,
}

impl ToolSelection {
    /// "No capability needed": routes the task to the direct-answer path.
    pub fn degraded(raw: &str) -> Self {
        Self {
            selected_tools: Vec::new(),
            reasoning: raw.to_string(),
            sequence: String::new(),
            confidence: default_confidence(),
        }
    }

    /// Drops duplicates and names outside `available`, keeping first-seen order.
    fn retain_known(&mut self, available: &[String]) {
        let mut kept: Vec<String> = Vec::with_capacity(self.selected_tools.len());
        for name in self.selected_tools.drain(..) {
            let name = name.trim().to_string();
            if kept.contains(&name) {
                continue;
            }
            if available.contains(&name) {
                kept.push(name);
            } else {
                warn!("Selection named unknown capability {}, dropping it", name);
            }
        }
        self.selected_tools = kept;
    }
}

impl Reasoner {
    /// Picks the ordered subset of `available` the task needs. An unparseable
    /// reply selects nothing.
    pub async fn select_tools(&self, task: &str, available: &[String]) -> Staged<ToolSelection> {
        let request = GenerationRequest::new(
            GenerationStage::ToolSelection,
            build_selection_instruction(available),
            build_selection_content(task),
        )
        .with_max_output_tokens(self.config.limits.tool_selection)
        .with_temperature(self.config.temperature);

        let raw = self.generate(request).await;
        let staged = match parse_object::<ToolSelection>(&raw) {
            Ok(mut selection) => {
                selection.retain_known(available);
                Staged::Parsed(selection)
            }
            Err(e) => {
                warn!("Tool selection reply unusable, selecting nothing: {}", e);
                Staged::Degraded(ToolSelection::degraded(&raw))
            }
        };

        let selected = &staged.value().selected_tools;
        if selected.is_empty() {
            info!("No capability selected");
        } else {
            info!("Selected capabilities: {}", selected.join(", "));
        }
        staged
    }
}
