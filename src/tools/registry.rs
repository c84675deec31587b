use std::{any::Any, collections::HashMap, panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;
use tracing::{debug, info, warn};

use crate::{
    error::agent_error::AgentError,
    tools::{
        capability::Capability,
        model::{Arguments, CapabilityDescriptor, ExecutionResult},
    },
};

/// Capabilities keyed by name. Listing follows first-registration order;
/// re-registering a name replaces the capability in place.
#[derive(Default)]
pub struct CapabilityRegistry {
    capabilities: HashMap<String, Arc<dyn Capability>>,
    order: Vec<String>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, capability: Arc<dyn Capability>) {
        let name = capability.name().to_string();
        if self.capabilities.insert(name.clone(), capability).is_some() {
            warn!("Capability {} re-registered, previous instance replaced", name);
        } else {
            self.order.push(name.clone());
            info!("Capability {} registered", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Capability>> {
        self.capabilities.get(name).cloned()
    }

    pub fn descriptor(&self, name: &str) -> Option<&CapabilityDescriptor> {
        self.capabilities.get(name).map(|c| c.descriptor())
    }

    pub fn list(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// One entry per capability: `- name: description` plus its parameters.
    pub fn describe(&self) -> String {
        self.order
            .iter()
            .filter_map(|name| self.capabilities.get(name))
            .map(|capability| {
                let mut entry = format!("- {}: {}", capability.name(), capability.description());
                if !capability.parameters().is_empty() {
                    let params = capability
                        .parameters()
                        .iter()
                        .map(|p| format!("{}: {}", p.name, p.description))
                        .collect::<Vec<_>>()
                        .join(", ");
                    entry.push_str(&format!("\n  Parameters: {}", params));
                }
                entry
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Runs the named capability. Never fails: an unknown name, an `Err` or a
    /// panic all come back as `success: false`.
    pub async fn dispatch(&self, name: &str, arguments: Arguments) -> ExecutionResult {
        let Some(capability) = self.get(name) else {
            warn!("Dispatch to unknown capability {}", name);
            let error = AgentError::CapabilityNotFound(name.to_string());
            return ExecutionResult::failure(error.to_string());
        };

        debug!("Dispatching {} with {} argument(s)", name, arguments.len());
        match AssertUnwindSafe(capability.execute(arguments)).catch_unwind().await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                warn!("Capability {} returned an error: {}", name, e);
                ExecutionResult::failure(e.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!("Capability {} panicked: {}", name, message);
                ExecutionResult::failure(message)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "capability panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::error::Result;

    struct Fixed {
        descriptor: CapabilityDescriptor,
        outcome: &'static str,
    }

    impl Fixed {
        fn new(name: &str, description: &str, outcome: &'static str) -> Arc<dyn Capability> {
            Arc::new(Self {
                descriptor: CapabilityDescriptor::new(name, description)
                    .with_parameter("query", "str - what to look up"),
                outcome,
            })
        }
    }

    #[async_trait]
    impl Capability for Fixed {
        fn descriptor(&self) -> &CapabilityDescriptor {
            &self.descriptor
        }

        async fn execute(&self, arguments: Arguments) -> Result<ExecutionResult> {
            match self.outcome {
                "error" => Err(AgentError::ExecutionError("backend down".into()).into()),
                "panic" => panic!("capability exploded"),
                _ => Ok(ExecutionResult::success(json!({
                    "echo": arguments.get("query").cloned().unwrap_or_default(),
                    "by": self.descriptor.description,
                }))),
            }
        }
    }

    #[tokio::test]
    async fn unknown_name_is_failed_result() {
        let registry = CapabilityRegistry::new();
        let result = registry.dispatch("missing_tool", Arguments::new()).await;
        assert!(!result.success);
        assert!(result.result.is_none());
        assert!(result.error.unwrap().contains("missing_tool"));
    }

    #[tokio::test]
    async fn error_and_panic_are_contained() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Fixed::new("flaky", "errors", "error"));
        registry.register(Fixed::new("broken", "panics", "panic"));

        let flaky = registry.dispatch("flaky", Arguments::new()).await;
        assert!(!flaky.success);
        assert!(flaky.error.unwrap().contains("backend down"));

        let broken = registry.dispatch("broken", Arguments::new()).await;
        assert!(!broken.success);
        assert_eq!(broken.error.as_deref(), Some("capability exploded"));
    }

    #[tokio::test]
    async fn last_registration_wins_but_keeps_order() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Fixed::new("search", "first", "ok"));
        registry.register(Fixed::new("other", "second", "ok"));
        registry.register(Fixed::new("search", "replacement", "ok"));

        assert_eq!(registry.list(), vec!["search".to_string(), "other".to_string()]);
        assert_eq!(registry.len(), 2);

        let mut args = Arguments::new();
        args.insert("query".into(), json!("rust"));
        let result = registry.dispatch("search", args).await;
        assert!(result.success);
        assert_eq!(result.result.unwrap()["by"], "replacement");
    }

    #[test]
    fn describe_lists_parameters() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Fixed::new("search", "Search the knowledge base", "ok"));
        let text = registry.describe();
        assert!(text.contains("- search: Search the knowledge base"));
        assert!(text.contains("Parameters: query: str - what to look up"));
    }
}
