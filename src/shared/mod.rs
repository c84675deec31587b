pub mod config;

pub use config::{OrchestratorConfig, StageLimits};
