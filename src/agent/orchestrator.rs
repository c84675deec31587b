use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    agent::{
        evaluation::{Evaluation, Evaluator, PerformanceSummary},
        execution::Executor,
        identity::is_identity_question,
        memory::ReasoningLog,
        planning::Plan,
        reasoner::Reasoner,
        reflection::Reflection,
        selection::ToolSelection,
    },
    gateway::TextGateway,
    shared::OrchestratorConfig,
    tools::{
        Capability, CapabilityRegistry, DIRECT_ANSWER, ExecutionRecord, ExecutionResult,
        all_succeeded,
    },
};

/// Everything one orchestration cycle produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub task: String,
    pub reasoning: Plan,
    pub tool_selection: ToolSelection,
    pub execution_results: Vec<ExecutionRecord>,
    pub reflection: Option<Reflection>,
    pub evaluation: Evaluation,
    pub timestamp: DateTime<Utc>,
}

impl TaskRecord {
    /// Logical AND over every execution record.
    pub fn overall_success(&self) -> bool {
        all_succeeded(&self.execution_results)
    }
}

/// Runs reason → select → execute → reflect → evaluate for one task at a
/// time. Stage failures degrade to fallbacks; `execute_task` always returns
/// a complete record.
pub struct Orchestrator {
    config: OrchestratorConfig,
    registry: CapabilityRegistry,
    reasoner: Reasoner,
    executor: Executor,
    evaluator: Evaluator,
}

impl Orchestrator {
    pub fn new(gateway: Arc<dyn TextGateway>, config: OrchestratorConfig) -> Self {
        Self {
            reasoner: Reasoner::new(gateway.clone(), config.clone()),
            executor: Executor::new(gateway, config.clone()),
            evaluator: Evaluator::new(config.report_dir.clone()),
            registry: CapabilityRegistry::new(),
            config,
        }
    }

    pub fn with_capability(mut self, capability: Arc<dyn Capability>) -> Self {
        self.register(capability);
        self
    }

    pub fn register(&mut self, capability: Arc<dyn Capability>) {
        self.registry.register(capability);
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub fn reasoner(&self) -> &Reasoner {
        &self.reasoner
    }

    pub fn reasoning_log(&self) -> &ReasoningLog {
        self.reasoner.log()
    }

    /// Drops every logged plan and reflection. Metrics are kept.
    pub fn clear_reasoning_log(&mut self) {
        self.reasoner.log.clear();
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn performance_summary(&self) -> PerformanceSummary {
        self.evaluator.performance_summary()
    }

    pub async fn execute_task(&mut self, task: &str, auto_reflect: bool) -> TaskRecord {
        info!("Task: {}", task);

        if self.config.identity_short_circuit && is_identity_question(task) {
            info!("Identity question, answering without stages");
            return self.identity_record(task);
        }

        let plan = self.reasoner.think(task, None).await.into_inner();
        debug!("Understanding: {}", plan.understanding);

        let available = self.registry.list();
        let selection = self.reasoner.select_tools(task, &available).await.into_inner();

        let mut results = self
            .executor
            .run(&self.registry, &selection.selected_tools, task, &plan)
            .await;
        if results.is_empty() {
            results.push(self.executor.direct_answer(task).await);
        }

        let overall_success = all_succeeded(&results);
        let reflection = if auto_reflect {
            let action = format!("Executed {} actions for task: {}", results.len(), task);
            let expected = Some(plan.execution_plan.as_str()).filter(|p| !p.trim().is_empty());
            Some(
                self.reasoner
                    .reflect(&action, &results, expected, overall_success)
                    .await
                    .into_inner(),
            )
        } else {
            None
        };

        let evaluation = self.evaluator.evaluate_task_execution(
            task,
            overall_success,
            plan.step_count(),
            &selection.selected_tools,
            reflection.as_ref(),
        );

        info!(
            "Task finished (success: {}, overall: {:.2})",
            overall_success, evaluation.overall
        );
        TaskRecord {
            id: Uuid::new_v4().simple().to_string(),
            task: task.to_string(),
            reasoning: plan,
            tool_selection: selection,
            execution_results: results,
            reflection,
            evaluation,
            timestamp: Utc::now(),
        }
    }

    fn identity_record(&self, task: &str) -> TaskRecord {
        TaskRecord {
            id: Uuid::new_v4().simple().to_string(),
            task: task.to_string(),
            reasoning: Plan {
                understanding: "The user is asking who the assistant is.".to_string(),
                execution_plan: "Answer with the assistant's identity.".to_string(),
                ..Default::default()
            },
            tool_selection: ToolSelection {
                selected_tools: Vec::new(),
                reasoning: "Identity questions need no capability.".to_string(),
                sequence: String::new(),
                confidence: 1.0,
            },
            execution_results: vec![ExecutionRecord::new(
                DIRECT_ANSWER,
                ExecutionResult::success(Value::String(self.config.identity.clone())),
            )],
            reflection: None,
            evaluation: Evaluation::perfect(),
            timestamp: Utc::now(),
        }
    }
}
