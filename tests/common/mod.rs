#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use agentloop::{
    error::{Error, Result, agent_error::AgentError},
    gateway::{FnGateway, GenerationRequest, GenerationStage, TextGateway},
    tools::{Arguments, Capability, CapabilityDescriptor, ExecutionResult},
};
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Fail(String),
}

pub fn text(s: impl Into<String>) -> Reply {
    Reply::Text(s.into())
}

pub type CallLog = Arc<Mutex<Vec<GenerationRequest>>>;

/// Gateway answering from a per-stage queue. The last reply of a stage is
/// repeated; stages without a script get unparseable prose.
pub fn scripted(script: Vec<(GenerationStage, Vec<Reply>)>) -> (Arc<dyn TextGateway>, CallLog) {
    let queues: HashMap<GenerationStage, VecDeque<Reply>> = script
        .into_iter()
        .map(|(stage, replies)| (stage, replies.into_iter().collect()))
        .collect();
    let queues = Mutex::new(queues);
    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let seen = calls.clone();

    let gateway = FnGateway::new(move |request: &GenerationRequest| {
        seen.lock().unwrap().push(request.clone());
        let mut queues = queues.lock().unwrap();
        let reply = match queues.get_mut(&request.stage) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        match reply {
            Some(Reply::Text(t)) => Ok(t),
            Some(Reply::Fail(e)) => Err(Error::AgentError(AgentError::GatewayError(e))),
            None => Ok(format!("Sure, I can help with that ({}).", request.stage)),
        }
    });
    (Arc::new(gateway), calls)
}

/// Gateway whose every call fails.
pub fn offline() -> Arc<dyn TextGateway> {
    Arc::new(FnGateway::new(|_: &GenerationRequest| {
        Err(Error::AgentError(AgentError::GatewayError("connection refused".into())))
    }))
}

pub fn stages(calls: &CallLog) -> Vec<GenerationStage> {
    calls.lock().unwrap().iter().map(|r| r.stage).collect()
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Succeed(Value),
    Fail(String),
    Error(String),
}

pub struct Stub {
    descriptor: CapabilityDescriptor,
    outcome: Outcome,
    pub seen: Mutex<Vec<Arguments>>,
}

impl Stub {
    pub fn new(descriptor: CapabilityDescriptor, outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            descriptor,
            outcome,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn named(name: &str, outcome: Outcome) -> Arc<Self> {
        Self::new(
            CapabilityDescriptor::new(name, format!("{} stub", name))
                .with_parameter("query", "str - input"),
            outcome,
        )
    }

    pub fn calls(&self) -> Vec<Arguments> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Capability for Stub {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    async fn execute(&self, arguments: Arguments) -> Result<ExecutionResult> {
        self.seen.lock().unwrap().push(arguments);
        match &self.outcome {
            Outcome::Succeed(v) => Ok(ExecutionResult::success(v.clone())),
            Outcome::Fail(e) => Ok(ExecutionResult::failure(e.clone())),
            Outcome::Error(e) => Err(AgentError::ExecutionError(e.clone()).into()),
        }
    }
}

pub fn plan_with_steps(n: usize) -> String {
    let steps: Vec<String> = (1..=n).map(|i| format!("Step {}", i)).collect();
    serde_json::json!({
        "understanding": "understood",
        "steps": steps,
        "tools_needed": [],
        "potential_challenges": [],
        "execution_plan": "do the steps"
    })
    .to_string()
}

pub fn selecting(tools: &[&str]) -> String {
    serde_json::json!({
        "selected_tools": tools,
        "reasoning": "needed",
        "sequence": tools.join(" then "),
        "confidence": 0.9
    })
    .to_string()
}
