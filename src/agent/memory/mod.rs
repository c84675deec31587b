use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::agent::{planning::Plan, reflection::Reflection};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogEntry {
    Reasoning {
        timestamp: DateTime<Utc>,
        task: String,
        reasoning: Plan,
    },
    Reflection {
        timestamp: DateTime<Utc>,
        action: String,
        reflection: Reflection,
    },
}

impl LogEntry {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            LogEntry::Reasoning { timestamp, .. } | LogEntry::Reflection { timestamp, .. } => {
                *timestamp
            }
        }
    }
}

/// Append-only record of every plan and reflection produced in a session.
#[derive(Debug, Default, Clone)]
pub struct ReasoningLog {
    entries: Vec<LogEntry>,
}

impl ReasoningLog {
    pub fn record_reasoning(&mut self, task: &str, plan: &Plan) {
        self.entries.push(LogEntry::Reasoning {
            timestamp: Utc::now(),
            task: task.to_string(),
            reasoning: plan.clone(),
        });
    }

    pub fn record_reflection(&mut self, action: &str, reflection: &Reflection) {
        self.entries.push(LogEntry::Reflection {
            timestamp: Utc::now(),
            action: action.to_string(),
            reflection: reflection.clone(),
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
