use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::evaluation::scores::Evaluation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskHistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub task: String,
    pub success: bool,
    pub scores: Evaluation,
    pub tools_used: Vec<String>,
}

/// Session-wide running tally. Only the owning evaluator mutates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_tasks: u64,
    pub successful_tasks: u64,
    pub failed_tasks: u64,
    pub tools_used: BTreeMap<String, u64>,
    pub average_reasoning_steps: f64,
    pub reflections_performed: u64,
    pub task_history: Vec<TaskHistoryEntry>,
}

impl PerformanceMetrics {
    pub(crate) fn record(
        &mut self,
        task: &str,
        success: bool,
        reasoning_steps: usize,
        tools_used: &[String],
        reflected: bool,
        scores: Evaluation,
    ) {
        self.total_tasks += 1;
        if success {
            self.successful_tasks += 1;
        } else {
            self.failed_tasks += 1;
        }

        let n = self.total_tasks as f64;
        self.average_reasoning_steps =
            (self.average_reasoning_steps * (n - 1.0) + reasoning_steps as f64) / n;

        for tool in tools_used {
            *self.tools_used.entry(tool.clone()).or_insert(0) += 1;
        }
        if reflected {
            self.reflections_performed += 1;
        }

        self.task_history.push(TaskHistoryEntry {
            timestamp: Utc::now(),
            task: task.to_string(),
            success,
            scores,
            tools_used: tools_used.to_vec(),
        });
    }

    pub fn summary(&self) -> PerformanceSummary {
        let ratio = |count: u64| {
            if self.total_tasks == 0 {
                0.0
            } else {
                count as f64 / self.total_tasks as f64
            }
        };

        let average_scores = if self.task_history.is_empty() {
            AverageScores::default()
        } else {
            let n = self.task_history.len() as f64;
            let mean = |f: fn(&Evaluation) -> f64| {
                self.task_history.iter().map(|t| f(&t.scores)).sum::<f64>() / n
            };
            AverageScores {
                overall: mean(|s| s.overall),
                efficiency: mean(|s| s.efficiency),
                tool_usage: mean(|s| s.tool_usage),
                reflection_quality: mean(|s| s.reflection_quality),
            }
        };

        let most_used_tool = self
            .tools_used
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| "none".to_string());

        PerformanceSummary {
            total_tasks: self.total_tasks,
            success_rate: ratio(self.successful_tasks),
            reflection_rate: ratio(self.reflections_performed),
            average_reasoning_steps: (self.average_reasoning_steps * 100.0).round() / 100.0,
            average_scores,
            tools_usage_count: self.tools_used.clone(),
            most_used_tool,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AverageScores {
    pub overall: f64,
    pub efficiency: f64,
    pub tool_usage: f64,
    pub reflection_quality: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub total_tasks: u64,
    pub success_rate: f64,
    pub reflection_rate: f64,
    pub average_reasoning_steps: f64,
    pub average_scores: AverageScores,
    pub tools_usage_count: BTreeMap<String, u64>,
    pub most_used_tool: String,
}
