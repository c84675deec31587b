#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    #[error("parse error: {0}")]
    ParseError(String),

    #[error("capability '{0}' not found")]
    CapabilityNotFound(String),

    #[error("execution failed: {0}")]
    ExecutionError(String),

    #[error("gateway error: {0}")]
    GatewayError(String),

    #[error("configuration error: {0}")]
    ConfigurationError(String),

    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },
}
