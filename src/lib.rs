//! Single-task agent loop: reason about a task, select capabilities, run
//! them, reflect on the outcome and score the run.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use agentloop::{agent::Orchestrator, gateway::OpenAiGateway, shared::OrchestratorConfig};
//! # async fn demo() {
//! let gateway = Arc::new(OpenAiGateway::default());
//! let mut orchestrator = Orchestrator::new(gateway, OrchestratorConfig::default());
//! let record = orchestrator.execute_task("What is machine learning?", true).await;
//! println!("{:.2}", record.evaluation.overall);
//! # }
//! ```

pub mod agent;
pub mod error;
pub mod gateway;
pub mod prompt;
pub mod shared;
pub mod tools;
pub mod utils;

pub use error::{Error, Result};
