const IDENTITY_PHRASES: [&str; 7] = [
    "who are you",
    "what are you",
    "what can you do",
    "what is your name",
    "what's your name",
    "introduce yourself",
    "tell me about yourself",
];

/// True when the whole task is one of the fixed self-referential questions.
pub fn is_identity_question(task: &str) -> bool {
    let normalized = task
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_punctuation() && c != '\'')
        .trim()
        .to_lowercase();
    IDENTITY_PHRASES.contains(&normalized.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_phrasings() {
        assert!(is_identity_question("who are you"));
        assert!(is_identity_question("  Who are you?  "));
        assert!(is_identity_question("What's your name?!"));
        assert!(is_identity_question("WHAT CAN YOU DO."));
    }

    #[test]
    fn ignores_embedded_phrases() {
        assert!(!is_identity_question("who are you going to email about quantum computing"));
        assert!(!is_identity_question("introduce yourself to carol@example.org"));
        assert!(!is_identity_question(""));
    }
}
