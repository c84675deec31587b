//! Reference capabilities wired by the demo runner. Storage, retrieval and
//! mail delivery backends live outside this crate; these wrap them behind the
//! [`Capability`](crate::tools::Capability) contract.

pub mod content;
pub mod email;
pub mod knowledge;

pub use content::{ContentGenerator, ContentKind};
pub use email::{EmailSender, MailTransport, OutgoingEmail};
pub use knowledge::{GroundedAnswer, KnowledgeBase, KnowledgeChunk, KnowledgeQuery, QueryMode};

use serde_json::Value;

use crate::tools::model::Arguments;

pub(crate) fn string_arg<'a>(arguments: &'a Arguments, name: &str) -> Option<&'a str> {
    arguments
        .get(name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

pub(crate) fn bool_arg(arguments: &Arguments, name: &str) -> Option<bool> {
    match arguments.get(name)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// A positive count given as a number or a numeric string.
pub(crate) fn count_arg(arguments: &Arguments, name: &str) -> Option<u64> {
    match arguments.get(name)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|n| *n > 0)
}
