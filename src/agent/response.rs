use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::{error::agent_error::AgentError, utils::StripCodeBlock};

/// Result of a stage that can fall back. Both arms carry a usable value;
/// `Degraded` means the model reply could not be parsed and the stage
/// substituted its fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum Staged<T> {
    Parsed(T),
    Degraded(T),
}

impl<T> Staged<T> {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Staged::Degraded(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Staged::Parsed(v) | Staged::Degraded(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Staged::Parsed(v) | Staged::Degraded(v) => v,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Staged<U> {
        match self {
            Staged::Parsed(v) => Staged::Parsed(f(v)),
            Staged::Degraded(v) => Staged::Degraded(f(v)),
        }
    }
}

/// Parses a raw generation reply into structured data, tolerating a
/// markdown fence around it.
pub fn parse_structured(raw: &str) -> Result<Value, AgentError> {
    let stripped = raw.strip_code_block();
    serde_json::from_str(stripped).map_err(|e| {
        debug!("Reply is not structured data: {}", e);
        AgentError::ParseError(e.to_string())
    })
}

/// Like [`parse_structured`] but requires an object and decodes it into `T`.
pub fn parse_object<T: DeserializeOwned>(raw: &str) -> Result<T, AgentError> {
    match parse_structured(raw)? {
        value @ Value::Object(_) => {
            serde_json::from_value(value).map_err(|e| AgentError::ParseError(e.to_string()))
        }
        other => Err(AgentError::ParseError(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Deserializers that accept the loose shapes models tend to produce.
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn stringify(value: Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    /// A list of strings; a lone value becomes a one-element list.
    pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items.into_iter().filter_map(stringify).collect(),
            other => stringify(other).into_iter().collect(),
        })
    }

    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(stringify(Value::deserialize(deserializer)?).unwrap_or_default())
    }

    pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(stringify(Value::deserialize(deserializer)?).filter(|s| !s.trim().is_empty()))
    }

    /// A number or numeric string clamped to [0, 1]; anything else is 0.5.
    pub fn unit_interval<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(raw.filter(|v| v.is_finite()).map_or(0.5, |v| v.clamp(0.0, 1.0)))
    }

    pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Bool(b) => b,
            Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes"),
            _ => true,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Loose {
        #[serde(default, deserialize_with = "lenient::string_list")]
        items: Vec<String>,
        #[serde(default = "half", deserialize_with = "lenient::unit_interval")]
        score: f64,
    }

    fn half() -> f64 {
        0.5
    }

    #[test]
    fn parses_fenced_json() {
        let value = parse_structured("```json\n{\"ok\": true}\n```").unwrap();
        assert_eq!(value, json!({"ok": true}));
    }

    #[test]
    fn prose_is_parse_error() {
        let err = parse_structured("I think we should email Alice.").unwrap_err();
        assert!(matches!(err, AgentError::ParseError(_)));
    }

    #[test]
    fn object_required() {
        let err = parse_object::<Loose>("[1, 2]").unwrap_err();
        assert_eq!(err, AgentError::ParseError("expected a JSON object, got an array".into()));
    }

    #[test]
    fn lenient_fields_accept_loose_shapes() {
        let loose: Loose =
            parse_object(r#"{"items": ["a", 2, null, {"k": 1}], "score": "1.7"}"#).unwrap();
        assert_eq!(loose.items, vec!["a", "2", "{\"k\":1}"]);
        assert_eq!(loose.score, 1.0);

        let loose: Loose = parse_object(r#"{"items": "solo", "score": "high"}"#).unwrap();
        assert_eq!(loose.items, vec!["solo"]);
        assert_eq!(loose.score, 0.5);

        let loose: Loose = parse_object("{}").unwrap();
        assert!(loose.items.is_empty());
        assert_eq!(loose.score, 0.5);
    }

    #[test]
    fn staged_helpers() {
        let staged = Staged::Degraded(2).map(|v| v * 10);
        assert!(staged.is_degraded());
        assert_eq!(*staged.value(), 20);
        assert_eq!(Staged::Parsed("x").into_inner(), "x");
    }
}
