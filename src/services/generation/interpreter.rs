//! Turns free-form model output into test case records.

use serde::Deserialize;

use crate::models::{GeneratedTestCase, Steps};

const FALLBACK_TITLE: &str = "Generated Test Case";

/// Test cases recovered from a model answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    /// The answer contained a usable JSON array.
    Parsed(Vec<GeneratedTestCase>),
    /// Nothing usable was found; a single placeholder record stands in.
    Placeholder(Vec<GeneratedTestCase>),
}

impl Interpretation {
    pub fn records(&self) -> &[GeneratedTestCase] {
        match self {
            Self::Parsed(records) | Self::Placeholder(records) => records,
        }
    }

    pub fn into_records(self) -> Vec<GeneratedTestCase> {
        match self {
            Self::Parsed(records) | Self::Placeholder(records) => records,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

/// Lenient shape of one record in model output.
#[derive(Debug, Deserialize)]
struct RawTestCase {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    steps: Option<Steps>,
    #[serde(default)]
    expected_result: Option<String>,
}

impl From<RawTestCase> for GeneratedTestCase {
    fn from(raw: RawTestCase) -> Self {
        let title = raw
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_TITLE.to_string());

        GeneratedTestCase {
            title,
            description: raw.description.unwrap_or_default(),
            steps: raw.steps.map(Steps::into_vec).unwrap_or_default(),
            expected_result: raw.expected_result.unwrap_or_default(),
        }
    }
}

/// Extract test cases from `text`.
///
/// Takes the span from the first `[` to the last `]` and parses it as a JSON
/// array of records; anything else yields the placeholder.
pub fn interpret_test_cases(text: &str) -> Interpretation {
    let span = match (text.find('['), text.rfind(']')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => return Interpretation::Placeholder(vec![placeholder_test_case()]),
    };

    match serde_json::from_str::<Vec<RawTestCase>>(span) {
        Ok(raw) => Interpretation::Parsed(raw.into_iter().map(Into::into).collect()),
        Err(e) => {
            tracing::debug!(error = %e, "Model output is not a test case array");
            Interpretation::Placeholder(vec![placeholder_test_case()])
        }
    }
}

/// Scripts are used exactly as the model wrote them.
pub fn interpret_script(text: String) -> String {
    text
}

/// The single record substituted for uninterpretable output.
pub fn placeholder_test_case() -> GeneratedTestCase {
    GeneratedTestCase {
        title: FALLBACK_TITLE.to_string(),
        description: "Test case generated from input".to_string(),
        steps: vec![
            "1. Execute the test".to_string(),
            "2. Verify results".to_string(),
        ],
        expected_result: "Test should pass".to_string(),
    }
}
