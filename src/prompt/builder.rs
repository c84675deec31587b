use crate::{
    agent::planning::Plan,
    tools::{CapabilityDescriptor, ExecutionRecord},
};

pub fn build_reasoning_instruction() -> String {
    r#"You are an AI agent with strong reasoning capabilities.
Your task is to think through problems step by step before taking action.
When given a task, you should:
1. Understand the goal clearly
2. Break it down into actionable steps
3. Identify what tools or resources you'll need
4. Consider potential challenges
5. Create a clear execution plan

Respond in JSON format with the following structure:
{
    "understanding": "What you understand about the task",
    "steps": ["Step 1", "Step 2", ...],
    "tools_needed": ["tool1", "tool2", ...],
    "potential_challenges": ["challenge1", "challenge2", ...],
    "execution_plan": "Your detailed plan"
}"#
    .to_string()
}

pub fn build_reasoning_content(task: &str, context: Option<&str>) -> String {
    match context.filter(|c| !c.trim().is_empty()) {
        Some(context) => format!("Task: {}\n\nAdditional Context: {}", task, context),
        None => format!("Task: {}", task),
    }
}

pub fn build_selection_instruction(available: &[String]) -> String {
    format!(
        r#"You are an AI agent selecting the best tools for a task.
Available tools: {}

Analyze the task carefully and select ONLY the tool(s) that are explicitly needed.
- If the user asks for ONE specific output (e.g., "write a blog post"), select ONLY that tool
- Only select multiple tools if the task explicitly composes actions
  (e.g., "write a newsletter and email it")
- List the tools in the order they must run
- If the task can be answered directly without any tool, return an empty list

IMPORTANT: These are the ONLY tools available. Do not use or reference any other tools.

Respond in JSON format:
{{
    "selected_tools": ["tool1"],
    "reasoning": "Why this tool is appropriate",
    "sequence": "The order to use them in",
    "confidence": 0.0-1.0
}}"#,
        available.join(", ")
    )
}

pub fn build_selection_content(task: &str) -> String {
    format!("Task: {}", task)
}

pub fn build_parameter_instruction(descriptor: &CapabilityDescriptor) -> String {
    let schema = serde_json::to_string_pretty(&descriptor.parameters_schema())
        .unwrap_or_else(|_| "{}".to_string());
    format!(
        r#"You are a parameter extraction assistant.
Given a task and a tool, extract the appropriate parameters.

Tool: {}
Description: {}
Parameters: {}

Respond ONLY with a valid JSON object containing the parameters. No other text."#,
        descriptor.name, descriptor.description, schema
    )
}

pub fn build_parameter_content(task: &str, tool: &str, plan: &Plan) -> String {
    let mut content = format!(
        "Task: {}\n\nExtract the parameters for the {} tool from this task.\n\
         If a parameter is not explicitly mentioned, use a sensible default or leave it out.",
        task, tool
    );
    if !plan.execution_plan.trim().is_empty() {
        content.push_str(&format!("\n\nExecution plan: {}", plan.execution_plan));
    }
    content
}

pub fn build_direct_answer_instruction(assistant_name: &str) -> String {
    format!(
        "You are {}, a helpful educational assistant.\n\
         Provide clear, concise, and accurate answers to questions.",
        assistant_name
    )
}

/// The outcome is stated as fact; the model explains it, it does not judge it.
pub fn build_reflection_instruction(success: bool) -> String {
    let (verdict, alternative) = if success {
        ("SUCCESSFUL", "")
    } else {
        (
            "UNSUCCESSFUL",
            ",\n    \"alternative_approach\": \"A different approach that could succeed\"",
        )
    };
    format!(
        r#"You are an AI agent capable of self-reflection.
Analyze the action taken and its result. The action was {}.
This is established fact; do not re-assess it.
Evaluate:
1. What was achieved?
2. What went well or what went wrong?
3. What could be improved for future tasks?
4. Are there any lessons learned?

Respond in JSON format:
{{
    "analysis": "Your analysis of what happened and why",
    "strengths": ["What went well"],
    "weaknesses": ["What could improve"],
    "next_steps": ["Recommended next actions"],
    "lessons_learned": ["Key takeaways"]{}
}}"#,
        verdict, alternative
    )
}

pub fn build_reflection_content(
    action_taken: &str,
    records: &[ExecutionRecord],
    expected_outcome: Option<&str>,
) -> String {
    let results = records
        .iter()
        .map(|record| {
            let outcome = if record.result.success {
                record
                    .result
                    .result
                    .as_ref()
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "null".to_string())
            } else {
                format!("FAILED: {}", record.result.error.as_deref().unwrap_or("unknown error"))
            };
            format!("- {}: {}", record.tool, outcome)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let mut content = format!("Action Taken: {}\nResult:\n{}", action_taken, results);
    if let Some(expected) = expected_outcome.filter(|e| !e.trim().is_empty()) {
        content.push_str(&format!("\nExpected Outcome: {}", expected));
    }
    content
}

pub fn build_critique_instruction(criteria: &[String]) -> String {
    let numbered = criteria
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {}", i + 1, c))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r#"You are an AI quality evaluator.
Evaluate the output based on these criteria:
{}

Respond in JSON format:
{{
    "overall_score": 0.0-1.0,
    "criteria_scores": {{"criterion": score, ...}},
    "strengths": ["strength1", "strength2"],
    "improvements": ["improvement1", "improvement2"],
    "revised_output": "Improved version if needed (or empty if good)",
    "meets_requirements": true/false
}}"#,
        numbered
    )
}

pub fn build_critique_content(task: &str, output: &str) -> String {
    format!("Task: {}\n\nOutput to Evaluate:\n{}", task, output)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::tools::ExecutionResult;

    #[test]
    fn selection_lists_every_name() {
        let text = build_selection_instruction(&["rag_query".into(), "send_email".into()]);
        assert!(text.contains("Available tools: rag_query, send_email"));
    }

    #[test]
    fn reflection_states_ground_truth() {
        assert!(build_reflection_instruction(true).contains("SUCCESSFUL"));
        let failed = build_reflection_instruction(false);
        assert!(failed.contains("UNSUCCESSFUL"));
        assert!(failed.contains("alternative_approach"));
        assert!(!failed.contains("\"success\""));
    }

    #[test]
    fn reflection_content_marks_failures() {
        let records = vec![
            ExecutionRecord::new("rag_query", ExecutionResult::success(json!({"answer": 42}))),
            ExecutionRecord::new("send_email", ExecutionResult::failure("smtp down")),
        ];
        let content = build_reflection_content("Executed 2 actions", &records, Some("send it"));
        assert!(content.contains("- rag_query: {\"answer\":42}"));
        assert!(content.contains("- send_email: FAILED: smtp down"));
        assert!(content.ends_with("Expected Outcome: send it"));
    }

    #[test]
    fn reasoning_content_skips_blank_context() {
        assert_eq!(build_reasoning_content("t", Some("  ")), "Task: t");
        assert_eq!(
            build_reasoning_content("t", Some("ctx")),
            "Task: t\n\nAdditional Context: ctx"
        );
    }
}
