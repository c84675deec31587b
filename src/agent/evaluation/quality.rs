use serde::{Deserialize, Serialize};

/// Heuristic quality of a free-text answer. No generation call involved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnswerQuality {
    pub completeness: f64,
    pub relevance: f64,
    pub source_quality: f64,
    pub clarity: f64,
    pub overall: f64,
}

pub fn evaluate_answer_quality(
    answer: &str,
    expected_keywords: Option<&[String]>,
    source_relevances: Option<&[f64]>,
) -> AnswerQuality {
    let word_count = answer.split_whitespace().count();
    let completeness = match word_count {
        0..=19 => 0.3,
        20..=49 => 0.6,
        50..=99 => 0.8,
        _ => 1.0,
    };

    let relevance = match expected_keywords {
        Some(keywords) if !keywords.is_empty() => {
            let lowered = answer.to_lowercase();
            let hits = keywords
                .iter()
                .filter(|k| lowered.contains(&k.to_lowercase()))
                .count();
            hits as f64 / keywords.len() as f64
        }
        _ => 0.8,
    };

    let source_quality = match source_relevances {
        Some(scores) if !scores.is_empty() => scores.iter().sum::<f64>() / scores.len() as f64,
        _ => 0.5,
    };

    let sentences = answer.matches(['.', '!', '?']).count().max(1);
    let avg_sentence = word_count as f64 / sentences as f64;
    let clarity = if (15.0..=25.0).contains(&avg_sentence) {
        1.0
    } else {
        (1.0 - (avg_sentence - 20.0).abs() / 20.0).max(0.5)
    };

    let overall = completeness * 0.3 + relevance * 0.3 + source_quality * 0.2 + clarity * 0.2;
    AnswerQuality {
        completeness,
        relevance,
        source_quality,
        clarity,
        overall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_answer_without_hints() {
        let q = evaluate_answer_quality("Rust is fast.", None, None);
        assert_eq!(q.completeness, 0.3);
        assert_eq!(q.relevance, 0.8);
        assert_eq!(q.source_quality, 0.5);
        // 3 words in one sentence
        assert_eq!(q.clarity, 0.5);
    }

    #[test]
    fn keywords_and_sources() {
        let answer = "Ownership and borrowing let Rust manage memory \
                      without a garbage collector at runtime.";
        let keywords = vec![
            "ownership".to_string(),
            "borrowing".to_string(),
            "lifetimes".to_string(),
        ];
        let q = evaluate_answer_quality(answer, Some(&keywords), Some(&[0.9, 0.7]));
        assert!((q.relevance - 2.0 / 3.0).abs() < 1e-9);
        assert!((q.source_quality - 0.8).abs() < 1e-9);
        // 13 words in one sentence
        assert!((q.clarity - 0.65).abs() < 1e-9);
    }
}
