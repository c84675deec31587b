pub trait StripCodeBlock {
    fn strip_code_block(&self) -> &str;
}

impl StripCodeBlock for str {
    /// Removes a leading fence (optionally tagged `json`) and a trailing fence.
    /// Either side is stripped independently, matching how models tend to
    /// truncate or half-fence their replies.
    fn strip_code_block(&self) -> &str {
        let trimmed = self.trim();
        let body = match trimmed.strip_prefix("```") {
            Some(rest) => rest
                .strip_prefix("json")
                .or_else(|| rest.strip_prefix("JSON"))
                .unwrap_or(rest),
            None => trimmed,
        };
        body.strip_suffix("```").unwrap_or(body).trim()
    }
}

/// Shortens `text` to at most `max` characters, appending `...` when cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tagged_fence() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(raw.strip_code_block(), "{\"a\": 1}");
    }

    #[test]
    fn strips_untagged_fence_on_one_line() {
        assert_eq!("```{\"a\": 1}```".strip_code_block(), "{\"a\": 1}");
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!("  {\"a\": 1}  ".strip_code_block(), "{\"a\": 1}");
        assert_eq!("no json here".strip_code_block(), "no json here");
    }

    #[test]
    fn strips_dangling_trailing_fence() {
        assert_eq!("{\"a\": 1}\n```".strip_code_block(), "{\"a\": 1}");
    }

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate_chars("héllo world", 5), "héllo...");
        assert_eq!(truncate_chars("short", 10), "short");
    }
}
