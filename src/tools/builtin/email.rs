use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::{
    error::{Result, agent_error::AgentError},
    tools::{
        builtin::{bool_arg, string_arg},
        capability::Capability,
        model::{Arguments, CapabilityDescriptor, ExecutionResult},
    },
};

static ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid address regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub is_html: bool,
}

/// Delivery backend. Returns a provider message id.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<String>;
}

pub struct EmailSender {
    descriptor: CapabilityDescriptor,
    transport: Option<Arc<dyn MailTransport>>,
}

impl EmailSender {
    pub fn new(transport: Option<Arc<dyn MailTransport>>) -> Self {
        let descriptor = CapabilityDescriptor::new(
            "send_email",
            "Send an email with content. Requires recipient email address, subject, and \
             message body.",
        )
        .with_parameter("recipient", "str - Recipient email address")
        .with_parameter("subject", "str - Email subject line")
        .with_parameter("body", "str - Email body content")
        .with_parameter("is_html", "bool - Whether body is HTML formatted (default: False)");
        Self {
            descriptor,
            transport,
        }
    }

    fn build(arguments: &Arguments) -> std::result::Result<OutgoingEmail, AgentError> {
        let recipient =
            string_arg(arguments, "recipient").ok_or_else(|| AgentError::InvalidArgument {
                name: "recipient".into(),
                reason: "missing".into(),
            })?;
        if !ADDRESS.is_match(recipient) {
            return Err(AgentError::InvalidArgument {
                name: "recipient".into(),
                reason: format!("'{}' is not an email address", recipient),
            });
        }
        let subject = string_arg(arguments, "subject").ok_or_else(|| AgentError::InvalidArgument {
            name: "subject".into(),
            reason: "missing".into(),
        })?;
        let body = string_arg(arguments, "body").ok_or_else(|| AgentError::InvalidArgument {
            name: "body".into(),
            reason: "missing".into(),
        })?;

        Ok(OutgoingEmail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            is_html: bool_arg(arguments, "is_html").unwrap_or(false),
        })
    }
}

#[async_trait]
impl Capability for EmailSender {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    async fn execute(&self, arguments: Arguments) -> Result<ExecutionResult> {
        let email = match Self::build(&arguments) {
            Ok(email) => email,
            Err(e) => return Ok(ExecutionResult::failure(e.to_string())),
        };

        let Some(transport) = &self.transport else {
            return Ok(ExecutionResult::failure(
                AgentError::ConfigurationError("no mail transport configured for send_email".into())
                    .to_string(),
            ));
        };

        let message_id = transport.send(&email).await?;
        info!("Email sent to {} ({})", email.recipient, message_id);
        Ok(ExecutionResult::success(json!({
            "message": format!("Email sent successfully to {}", email.recipient),
            "message_id": message_id,
            "subject": email.subject,
        })))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recording {
        sent: Mutex<Vec<OutgoingEmail>>,
    }

    #[async_trait]
    impl MailTransport for Recording {
        async fn send(&self, email: &OutgoingEmail) -> Result<String> {
            self.sent.lock().unwrap().push(email.clone());
            Ok("msg-1".to_string())
        }
    }

    fn args(recipient: &str) -> Arguments {
        let mut args = Arguments::new();
        args.insert("recipient".into(), json!(recipient));
        args.insert("subject".into(), json!("Hello"));
        args.insert("body".into(), json!("Body text"));
        args
    }

    #[tokio::test]
    async fn sends_through_transport() {
        let transport = Arc::new(Recording::default());
        let sender = EmailSender::new(Some(transport.clone()));

        let result = sender.execute(args("alice@example.com")).await.unwrap();
        assert!(result.success);
        assert_eq!(result.result.unwrap()["message_id"], "msg-1");
        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, "alice@example.com");
        assert!(!sent[0].is_html);
    }

    #[tokio::test]
    async fn missing_transport_is_configuration_failure() {
        let sender = EmailSender::new(None);
        let result = sender.execute(args("alice@example.com")).await.unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("configuration error"));
    }

    #[tokio::test]
    async fn rejects_bad_recipient() {
        let sender = EmailSender::new(None);
        let result = sender.execute(args("not-an-address")).await.unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("recipient"));
    }
}
