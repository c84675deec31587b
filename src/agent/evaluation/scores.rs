use serde::{Deserialize, Serialize};

use crate::agent::reflection::Reflection;

const W_SUCCESS: f64 = 0.4;
const W_EFFICIENCY: f64 = 0.2;
const W_TOOL_USAGE: f64 = 0.2;
const W_REFLECTION: f64 = 0.2;

/// Deterministic quality scores of one task, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub success: f64,
    pub efficiency: f64,
    pub tool_usage: f64,
    pub reflection_quality: f64,
    pub overall: f64,
}

impl Evaluation {
    pub fn compute(
        overall_success: bool,
        reasoning_steps: usize,
        tools_used: usize,
        reflection: Option<&Reflection>,
    ) -> Self {
        let success = if overall_success { 1.0 } else { 0.0 };
        let efficiency = efficiency(reasoning_steps);
        let tool_usage = tool_usage(tools_used);
        let reflection_quality = reflection.map_or(0.0, reflection_quality);
        let overall = W_SUCCESS * success
            + W_EFFICIENCY * efficiency
            + W_TOOL_USAGE * tool_usage
            + W_REFLECTION * reflection_quality;

        Self {
            success,
            efficiency,
            tool_usage,
            reflection_quality,
            overall,
        }
    }

    /// Score of the canned identity answer.
    pub fn perfect() -> Self {
        Self {
            success: 1.0,
            efficiency: 1.0,
            tool_usage: 1.0,
            reflection_quality: 1.0,
            overall: 1.0,
        }
    }
}

/// 1.0 up to one step, minus 0.1 per extra step, 0.0 from eleven steps on.
pub fn efficiency(reasoning_steps: usize) -> f64 {
    (1.0 - (reasoning_steps as f64 - 1.0) / 10.0).clamp(0.0, 1.0)
}

pub fn tool_usage(tools_used: usize) -> f64 {
    if tools_used == 0 {
        0.0
    } else {
        (tools_used as f64 / 3.0).min(1.0)
    }
}

pub fn reflection_quality(reflection: &Reflection) -> f64 {
    // success is always populated from ground truth
    let mut score = 0.2;
    if !reflection.analysis.trim().is_empty() {
        score += 0.3;
    }
    if !reflection.next_steps.is_empty() {
        score += 0.3;
    }
    if !reflection.success && reflection.alternative_approach.is_some() {
        score += 0.2;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reflection(
        success: bool,
        analysis: &str,
        next_steps: &[&str],
        alternative: Option<&str>,
    ) -> Reflection {
        Reflection {
            success,
            analysis: analysis.to_string(),
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            next_steps: next_steps.iter().map(|s| s.to_string()).collect(),
            lessons_learned: Vec::new(),
            alternative_approach: alternative.map(str::to_string),
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn efficiency_bounds_and_monotonicity() {
        assert_eq!(efficiency(0), 1.0);
        assert_eq!(efficiency(1), 1.0);
        assert_eq!(efficiency(11), 0.0);
        assert_eq!(efficiency(40), 0.0);
        assert!(close(efficiency(4), 0.7));
        for steps in 0..20 {
            assert!(efficiency(steps + 1) <= efficiency(steps));
        }
    }

    #[test]
    fn tool_usage_saturates() {
        assert_eq!(tool_usage(0), 0.0);
        assert!(close(tool_usage(1), 1.0 / 3.0));
        assert_eq!(tool_usage(3), 1.0);
        assert_eq!(tool_usage(5), 1.0);
    }

    #[test]
    fn reflection_quality_bands() {
        assert!(close(reflection_quality(&reflection(true, "", &[], None)), 0.2));
        assert!(close(reflection_quality(&reflection(true, "fine", &["ship"], None)), 0.8));
        // alternative only counts for failures
        assert!(close(reflection_quality(&reflection(true, "fine", &["ship"], Some("x"))), 0.8));
        let failed = reflection(false, "broke", &["retry"], Some("use cache"));
        assert!(close(reflection_quality(&failed), 1.0));
    }

    #[test]
    fn overall_is_weighted_sum() {
        let r = reflection(true, "ok", &["next"], None);
        let eval = Evaluation::compute(true, 3, 2, Some(&r));
        let expected = 0.4 + 0.2 * 0.8 + 0.2 * (2.0 / 3.0) + 0.2 * 0.8;
        assert!(close(eval.overall, expected));

        let skipped = Evaluation::compute(false, 1, 0, None);
        assert_eq!(skipped.reflection_quality, 0.0);
        assert!(close(skipped.overall, 0.2));
    }
}
