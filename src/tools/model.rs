use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tool name of the synthetic record produced when no capability was selected.
pub const DIRECT_ANSWER: &str = "direct_answer";

/// Argument map handed verbatim from parameter extraction to `execute`.
pub type Arguments = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    /// Human-readable type and meaning, e.g. `"str - Recipient email address"`.
    pub description: String,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
}

impl CapabilityDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.parameters.push(ParameterSpec::new(name, description));
        self
    }

    pub fn declares(&self, parameter: &str) -> bool {
        self.parameters.iter().any(|p| p.name == parameter)
    }

    /// Parameters as a JSON object, the shape models are asked to fill in.
    pub fn parameters_schema(&self) -> Value {
        let map: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), Value::String(p.description.clone())))
            .collect();
        Value::Object(map)
    }
}

/// Outcome of one capability invocation. `result` is meaningful only on
/// success, `error` only on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub result: Option<Value>,
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn success(result: Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub tool: String,
    pub result: ExecutionResult,
}

impl ExecutionRecord {
    pub fn new(tool: impl Into<String>, result: ExecutionResult) -> Self {
        Self {
            tool: tool.into(),
            result,
        }
    }
}

/// Ground-truth task success: every record succeeded. Vacuously true when empty.
pub fn all_succeeded(records: &[ExecutionRecord]) -> bool {
    records.iter().all(|r| r.result.success)
}
