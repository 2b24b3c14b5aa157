//! Prompt construction for the chat-completion model.

use crate::models::{GeneratedTestCase, ScriptType};

/// Prompt asking for test cases as a JSON array, followed by the raw input.
///
/// `label` is the human-readable source type, e.g. "user story".
pub fn test_case_prompt(content: &str, label: &str) -> String {
    format!(
        r#"Generate comprehensive test cases based on the following {label} input.
Return the response as a JSON array with the following structure:
[
    {{
        "title": "Test case title",
        "description": "Test case description",
        "steps": "Step 1. Do this\nStep 2. Do that\nStep 3. Verify this",
        "expected_result": "Expected outcome"
    }}
]

Input content:
{content}
"#
    )
}

/// Prompt asking for a runnable script covering `test_cases`.
pub fn script_prompt(test_cases: &[GeneratedTestCase], script_type: ScriptType) -> String {
    // Serializing plain strings and vectors cannot fail.
    let cases_json = serde_json::to_string_pretty(test_cases).unwrap_or_else(|_| "[]".to_string());
    let framework = script_type.framework_name();

    format!(
        r#"Generate an automation script using {framework} based on the following test cases.
The script should be complete and executable.

Test cases:
{cases_json}

Generate a complete Python script that can run these test cases.
"#
    )
}
