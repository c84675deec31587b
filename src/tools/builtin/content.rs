use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::Local;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::{
    error::{Result, agent_error::AgentError},
    gateway::{GenerationRequest, GenerationStage, TextGateway, is_error_text},
    tools::{
        builtin::{bool_arg, count_arg, string_arg},
        capability::Capability,
        model::{Arguments, CapabilityDescriptor, ExecutionResult},
    },
};

const DEFAULT_SECTIONS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    BlogPost,
    Newsletter,
}

impl ContentKind {
    fn capability_name(&self) -> &'static str {
        match self {
            ContentKind::BlogPost => "generate_blog_post",
            ContentKind::Newsletter => "generate_newsletter",
        }
    }

    fn file_prefix(&self) -> &'static str {
        match self {
            ContentKind::BlogPost => "blog_post",
            ContentKind::Newsletter => "newsletter",
        }
    }

    fn descriptor(&self) -> CapabilityDescriptor {
        let save =
            "bool - Whether to save to a file (default: true when an output directory is set)";
        match self {
            ContentKind::BlogPost => CapabilityDescriptor::new(
                self.capability_name(),
                "Generate a blog post or social media content about a specific topic.",
            )
            .with_parameter("topic", "str - The topic to write about")
            .with_parameter(
                "style",
                "str - Writing style: 'professional', 'casual', 'technical', 'social_media' \
                 (default: 'professional')",
            )
            .with_parameter(
                "length",
                "str - Content length: 'short' (300 words), 'medium' (600 words), \
                 'long' (1000+ words) (default: 'medium')",
            )
            .with_parameter("save_to_file", save),
            ContentKind::Newsletter => CapabilityDescriptor::new(
                self.capability_name(),
                "Generate an email newsletter summarising a topic for subscribers.",
            )
            .with_parameter("topic", "str - The newsletter topic")
            .with_parameter("sections", "int - Number of sections (default: 3)")
            .with_parameter("save_to_file", save),
        }
    }
}

fn style_instruction(style: &str) -> &'static str {
    match style {
        "casual" => "Use a conversational, friendly tone as if talking to a friend.",
        "technical" => "Use technical language and precise terminology for a technical audience.",
        "social_media" => {
            "Use engaging, concise language with hashtags at the end. Keep it punchy and shareable."
        }
        _ => "Use a professional, authoritative tone suitable for a business blog.",
    }
}

fn word_target(length: &str) -> &'static str {
    match length {
        "short" => "300-400",
        "long" => "1000-1500",
        _ => "600-800",
    }
}

/// Topic reduced to alphanumerics, `-` and `_`, spaces as underscores, at most 50 chars.
fn file_safe(topic: &str) -> String {
    topic
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim_end()
        .replace(' ', "_")
        .chars()
        .take(50)
        .collect()
}

/// Writes long-form text through the text-generation gateway.
pub struct ContentGenerator {
    kind: ContentKind,
    descriptor: CapabilityDescriptor,
    gateway: Arc<dyn TextGateway>,
    output_dir: Option<PathBuf>,
}

impl ContentGenerator {
    pub fn new(kind: ContentKind, gateway: Arc<dyn TextGateway>) -> Self {
        Self {
            kind,
            descriptor: kind.descriptor(),
            gateway,
            output_dir: None,
        }
    }

    /// Enables `save_to_file`; generated text lands under `dir`.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    fn blog_request(&self, topic: &str, style: &str, length: &str) -> GenerationRequest {
        let system = format!(
            "You are a professional content writer and educator.\n\
             Create engaging, informative content based on the provided topic.\n{}\n\
             Target length: {} words.\n\n\
             For blog posts include a compelling title, an introduction, clear sections and a \
             conclusion.\nFor social media posts open with a hook, keep paragraphs short and end \
             with 3-5 hashtags.",
            style_instruction(style),
            word_target(length),
        );
        GenerationRequest::new(
            GenerationStage::Content,
            system,
            format!(
                "Topic: {}\n\nPlease create {} {} content about this topic.",
                topic, length, style
            ),
        )
        .with_max_output_tokens(3000)
    }

    fn newsletter_request(&self, topic: &str, sections: u64) -> GenerationRequest {
        let system = "You are a professional newsletter writer.\n\
                      Create an engaging, informative newsletter with:\n\
                      - A catchy subject line\n\
                      - A warm greeting\n\
                      - Clear sections with headings\n\
                      - Engaging but professional tone\n\
                      - A call-to-action or conclusion\n\
                      - Professional sign-off\n\n\
                      Format the newsletter ready for email distribution.";
        GenerationRequest::new(
            GenerationStage::Content,
            system,
            format!(
                "Topic: {}\nNumber of sections: {}\n\nCreate a newsletter about this topic.",
                topic, sections
            ),
        )
    }

    async fn save(&self, dir: &Path, file_name: String, text: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(file_name);
        tokio::fs::write(&path, text).await?;
        info!("Content saved to {}", path.display());
        Ok(path)
    }
}

#[async_trait]
impl Capability for ContentGenerator {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    async fn execute(&self, arguments: Arguments) -> Result<ExecutionResult> {
        let Some(topic) = string_arg(&arguments, "topic") else {
            return Ok(ExecutionResult::failure("missing required parameter 'topic'"));
        };

        let (request, mut payload) = match self.kind {
            ContentKind::BlogPost => {
                let style = string_arg(&arguments, "style").unwrap_or("professional");
                let length = string_arg(&arguments, "length").unwrap_or("medium");
                let payload = json!({
                    "topic": topic,
                    "style": style,
                    "length": length,
                    "word_target": word_target(length),
                });
                (self.blog_request(topic, style, length), payload)
            }
            ContentKind::Newsletter => {
                let sections = count_arg(&arguments, "sections").unwrap_or(DEFAULT_SECTIONS);
                let payload = json!({ "topic": topic, "sections": sections });
                (self.newsletter_request(topic, sections), payload)
            }
        };

        let content = self.gateway.generate(request).await?;
        if is_error_text(&content) {
            return Err(AgentError::GatewayError(content).into());
        }
        info!("{} produced {} characters about {}", self.descriptor.name, content.len(), topic);

        let wants_file = bool_arg(&arguments, "save_to_file").unwrap_or(self.output_dir.is_some());
        let file_path = match (&self.output_dir, wants_file) {
            (Some(dir), true) => {
                let now = Local::now();
                let style = payload["style"]
                    .as_str()
                    .map(|s| format!("{}_", s))
                    .unwrap_or_default();
                let file_name = format!(
                    "{}_{}{}_{}.txt",
                    self.kind.file_prefix(),
                    style,
                    file_safe(topic),
                    now.format("%Y%m%d_%H%M%S")
                );
                let text = format!(
                    "Generated: {}\nTopic: {}\n{}\n\n{}",
                    now.format("%Y-%m-%d %H:%M:%S"),
                    topic,
                    "=".repeat(80),
                    content
                );
                let path = self.save(dir, file_name, &text).await?;
                Value::String(path.display().to_string())
            }
            (None, true) => {
                warn!(
                    "save_to_file requested for {} but no output directory is set",
                    self.descriptor.name
                );
                Value::Null
            }
            _ => Value::Null,
        };

        if let Value::Object(map) = &mut payload {
            map.insert("word_count".into(), json!(content.split_whitespace().count()));
            map.insert("content".into(), Value::String(content));
            map.insert("file_path".into(), file_path);
        }
        Ok(ExecutionResult::success(payload))
    }
}
