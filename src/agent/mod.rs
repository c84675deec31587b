pub mod evaluation;
pub mod execution;
pub mod identity;
pub mod memory;
pub mod orchestrator;
pub mod planning;
pub mod reasoner;
pub mod reflection;
pub mod response;
pub mod selection;

pub use evaluation::{Evaluation, Evaluator, PerformanceMetrics, PerformanceSummary};
pub use execution::{Executor, ParameterExtractor};
pub use memory::{LogEntry, ReasoningLog};
pub use orchestrator::{Orchestrator, TaskRecord};
pub use planning::Plan;
pub use reasoner::Reasoner;
pub use reflection::{Critique, Reflection};
pub use response::{Staged, parse_object, parse_structured};
pub use selection::ToolSelection;
