pub mod metrics;
pub mod quality;
pub mod scores;

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::{agent::reflection::Reflection, error::Result};

pub use metrics::{AverageScores, PerformanceMetrics, PerformanceSummary, TaskHistoryEntry};
pub use quality::{AnswerQuality, evaluate_answer_quality};
pub use scores::Evaluation;

/// Scores tasks and owns the session's [`PerformanceMetrics`].
#[derive(Debug, Clone)]
pub struct Evaluator {
    metrics: PerformanceMetrics,
    report_dir: PathBuf,
}

impl Evaluator {
    pub fn new(report_dir: impl Into<PathBuf>) -> Self {
        Self {
            metrics: PerformanceMetrics::default(),
            report_dir: report_dir.into(),
        }
    }

    /// Scores one task and folds it into the running metrics.
    pub fn evaluate_task_execution(
        &mut self,
        task: &str,
        overall_success: bool,
        reasoning_steps: usize,
        tools_used: &[String],
        reflection: Option<&Reflection>,
    ) -> Evaluation {
        let evaluation =
            Evaluation::compute(overall_success, reasoning_steps, tools_used.len(), reflection);
        self.metrics.record(
            task,
            overall_success,
            reasoning_steps,
            tools_used,
            reflection.is_some(),
            evaluation,
        );
        info!("Overall score: {:.2}", evaluation.overall);
        evaluation
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }

    pub fn performance_summary(&self) -> PerformanceSummary {
        self.metrics.summary()
    }

    /// Writes `{timestamp, summary, detailed_metrics}` as pretty JSON to `path`,
    /// or to a timestamped file under the report directory.
    pub async fn save_report(&self, path: Option<&Path>) -> Result<PathBuf> {
        let now = Utc::now();
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                tokio::fs::create_dir_all(&self.report_dir).await?;
                self.report_dir
                    .join(format!("evaluation_report_{}.json", now.format("%Y%m%d_%H%M%S")))
            }
        };

        let report = json!({
            "timestamp": now.to_rfc3339(),
            "summary": self.performance_summary(),
            "detailed_metrics": self.metrics,
        });
        tokio::fs::write(&path, serde_json::to_vec_pretty(&report)?).await?;
        info!("Evaluation report saved to {}", path.display());
        Ok(path)
    }
}
