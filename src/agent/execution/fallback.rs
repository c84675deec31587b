//! Deterministic argument extraction used when the model cannot produce
//! structured parameters. Patterns are matched against the task text only.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::{
    shared::OrchestratorConfig,
    tools::{Arguments, CapabilityDescriptor},
};

static EMAIL_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid address regex")
});

static SUBJECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bsubject\s*:\s*([^\n]+?)\s*(?:$|\n|[.;!?](?:\s|$))")
        .expect("valid subject regex")
});

// The topic stops before a follow-up action or an addressee, not at every conjunction.
static ABOUT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\babout\s+(.+?)",
        r"(?:\s+and\s+(?:then\s+)?(?:send|email|mail|forward)\b",
        r"|\s+then\s+",
        r"|\s+(?:with\s+|in\s+)?\d+\s+sections?\b",
        r"|\s+(?:to\s+)?[A-Za-z0-9._%+-]+@",
        r"|[.,;:!?](?:\s|$)",
        r"|$)",
    ))
    .expect("valid topic regex")
});

static SECTIONS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d+)\s+sections?\b").expect("valid sections regex"));

static INTRODUCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\b(introduce yourself|introducing yourself|self[- ]introduction",
        r"|introduction of yourself|about yourself|who you are)\b",
    ))
    .expect("valid introduction regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityKind {
    Email,
    Content,
    Retrieval,
    Other,
}

impl CapabilityKind {
    pub fn of(descriptor: &CapabilityDescriptor) -> Self {
        let name = descriptor.name.to_ascii_lowercase();
        if name.contains("email") {
            CapabilityKind::Email
        } else if name.starts_with("generate_") {
            CapabilityKind::Content
        } else if descriptor.declares("query") {
            CapabilityKind::Retrieval
        } else {
            CapabilityKind::Other
        }
    }
}

/// The "about <topic>" phrase of a task, if any.
pub fn topic_of(task: &str) -> Option<String> {
    ABOUT
        .captures(task)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().trim_matches(|ch| ch == '"' || ch == '\'').to_string())
        .filter(|t| !t.is_empty())
}

pub fn email_address_in(task: &str) -> Option<String> {
    EMAIL_ADDRESS.find(task).map(|m| m.as_str().to_string())
}

fn subject_in(task: &str) -> Option<String> {
    SUBJECT
        .captures(task)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn asks_for_introduction(task: &str) -> bool {
    INTRODUCTION.is_match(task)
}

pub fn extract(
    descriptor: &CapabilityDescriptor,
    task: &str,
    config: &OrchestratorConfig,
) -> Arguments {
    match CapabilityKind::of(descriptor) {
        CapabilityKind::Email => email_arguments(task, config),
        CapabilityKind::Content => content_arguments(descriptor, task),
        CapabilityKind::Retrieval => {
            let mut args = Arguments::new();
            args.insert("query".into(), Value::String(task.to_string()));
            args
        }
        CapabilityKind::Other => Arguments::new(),
    }
}

fn email_arguments(task: &str, config: &OrchestratorConfig) -> Arguments {
    let name = &config.assistant_name;
    let introduction = asks_for_introduction(task);
    let topic = if introduction { None } else { topic_of(task) };

    let subject = subject_in(task).unwrap_or_else(|| match (&topic, introduction) {
        (_, true) => format!("Introduction from {}", name),
        (Some(topic), false) => format!("Information about {}", topic),
        (None, false) => format!("Message from {}", name),
    });

    let body = if introduction {
        format!(
            "Hello,\n\n{}\n\nFeel free to reply with any questions.\n\nBest regards,\n{}",
            config.identity, name
        )
    } else if let Some(topic) = &topic {
        format!(
            "Hello,\n\nAs requested, this note is about {}. A full write-up will follow \
             shortly.\n\nBest regards,\n{}",
            topic, name
        )
    } else {
        format!(
            "Hello,\n\nThis message was sent on your behalf in response to: \"{}\"\n\n\
             Best regards,\n{}",
            task, name
        )
    };

    let mut args = Arguments::new();
    if let Some(recipient) = email_address_in(task) {
        args.insert("recipient".into(), Value::String(recipient));
    }
    args.insert("subject".into(), Value::String(subject));
    args.insert("body".into(), Value::String(body));
    args
}

fn content_arguments(descriptor: &CapabilityDescriptor, task: &str) -> Arguments {
    let lowered = task.to_ascii_lowercase();
    let mut args = Arguments::new();
    args.insert(
        "topic".into(),
        Value::String(topic_of(task).unwrap_or_else(|| task.trim().to_string())),
    );

    if descriptor.declares("style") {
        let style = if ["social media", "tweet", "linkedin", "instagram"]
            .iter()
            .any(|k| lowered.contains(k))
        {
            Some("social_media")
        } else if lowered.contains("casual") || lowered.contains("friendly") {
            Some("casual")
        } else if lowered.contains("technical") {
            Some("technical")
        } else if lowered.contains("professional") {
            Some("professional")
        } else {
            None
        };
        if let Some(style) = style {
            args.insert("style".into(), Value::String(style.into()));
        }
    }

    if descriptor.declares("length") {
        let length = if lowered.contains("short") || lowered.contains("brief") {
            Some("short")
        } else if ["long", "detailed", "in-depth", "comprehensive"]
            .iter()
            .any(|k| lowered.contains(k))
        {
            Some("long")
        } else {
            None
        };
        if let Some(length) = length {
            args.insert("length".into(), Value::String(length.into()));
        }
    }

    if descriptor.declares("sections") {
        let sections = SECTIONS
            .captures(task)
            .and_then(|c| c[1].parse::<u64>().ok())
            .filter(|n| *n > 0);
        if let Some(sections) = sections {
            args.insert("sections".into(), Value::from(sections));
        }
    }

    args
}
