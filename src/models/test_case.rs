//! Test case domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{ContentOrigin, InputSourceSummary};
use crate::entity::test_case;
use crate::error::{AppError, AppResult};

/// Test case status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TestCaseStatus {
    Pending,
    Passed,
    Failed,
    Running,
}

impl TestCaseStatus {
    pub const ALL: [TestCaseStatus; 4] = [
        TestCaseStatus::Pending,
        TestCaseStatus::Passed,
        TestCaseStatus::Failed,
        TestCaseStatus::Running,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Running => "running",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "passed" => Some(Self::Passed),
            "failed" => Some(Self::Failed),
            "running" => Some(Self::Running),
            _ => None,
        }
    }
}

impl std::fmt::Display for TestCaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Steps as accepted on input: one newline-delimited string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Steps {
    Text(String),
    List(Vec<String>),
}

impl Default for Steps {
    fn default() -> Self {
        Steps::List(Vec::new())
    }
}

impl Steps {
    /// One entry per non-blank line.
    ///
    /// List items holding several lines are split, so the result matches
    /// what is read back from storage.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Steps::Text(text) => split_steps(&text),
            Steps::List(list) => list.iter().flat_map(|item| split_steps(item)).collect(),
        }
    }
}

/// Split newline-delimited step text into individual steps.
pub fn split_steps(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Join steps into the newline-delimited storage form.
pub fn join_steps(steps: &[String]) -> String {
    steps.join("\n")
}

/// A test case as produced by generation or authored by hand, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct GeneratedTestCase {
    pub title: String,
    pub description: String,
    pub steps: Vec<String>,
    pub expected_result: String,
}

impl GeneratedTestCase {
    /// Build a record, rejecting a blank title.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        steps: Vec<String>,
        expected_result: impl Into<String>,
    ) -> AppResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "test case title must not be empty".to_string(),
            ));
        }

        Ok(GeneratedTestCase {
            title,
            description: description.into(),
            steps,
            expected_result: expected_result.into(),
        })
    }

    /// Steps in newline-delimited storage form.
    pub fn steps_text(&self) -> String {
        join_steps(&self.steps)
    }

    /// Rebuild the record from a stored row.
    pub fn from_stored(m: &test_case::Model) -> Self {
        GeneratedTestCase {
            title: m.title.clone(),
            description: m.description.clone(),
            steps: split_steps(&m.steps),
            expected_result: m.expected_result.clone(),
        }
    }
}

/// Stored test case representation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestCaseResponse {
    pub id: Uuid,
    pub input_source_id: Uuid,
    pub title: String,
    pub description: String,
    pub steps: Vec<String>,
    pub expected_result: String,
    pub status: TestCaseStatus,
    pub is_automated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<test_case::Model> for TestCaseResponse {
    fn from(m: test_case::Model) -> Self {
        TestCaseResponse {
            id: m.id,
            input_source_id: m.input_source_id,
            steps: split_steps(&m.steps),
            status: TestCaseStatus::parse(&m.status).unwrap_or(TestCaseStatus::Pending),
            title: m.title,
            description: m.description,
            expected_result: m.expected_result,
            is_automated: m.is_automated,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Response after generating test cases for an input source.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateTestCasesResponse {
    pub message: String,
    pub input_source_id: Uuid,
    pub origin: ContentOrigin,
    pub test_cases: Vec<TestCaseResponse>,
}

/// Request to author a test case by hand.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTestCaseRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Newline-delimited string or list of steps.
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub steps: Steps,
    #[serde(default)]
    pub expected_result: String,
    #[serde(default)]
    pub is_automated: bool,
}

/// Partial update of a test case.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateTestCaseRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<Vec<String>>)]
    pub steps: Option<Steps>,
    #[serde(default)]
    pub expected_result: Option<String>,
    #[serde(default)]
    pub status: Option<TestCaseStatus>,
    #[serde(default)]
    pub is_automated: Option<bool>,
}

/// Test case formatted for manual testing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ManualTestCase {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub steps: Vec<String>,
    pub expected_result: String,
    pub status: TestCaseStatus,
    pub is_automated: bool,
}

impl From<test_case::Model> for ManualTestCase {
    fn from(m: test_case::Model) -> Self {
        ManualTestCase {
            id: m.id,
            steps: split_steps(&m.steps),
            status: TestCaseStatus::parse(&m.status).unwrap_or(TestCaseStatus::Pending),
            title: m.title,
            description: m.description,
            expected_result: m.expected_result,
            is_automated: m.is_automated,
        }
    }
}

/// Manual testing view of an input source.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ManualTestCasesResponse {
    pub input_source: InputSourceSummary,
    pub test_cases: Vec<ManualTestCase>,
    pub total_count: usize,
}

/// Query for the status update endpoint.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateStatusQuery {
    pub status: String,
}

/// Response after a status update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusResponse {
    pub message: String,
    pub test_case_id: Uuid,
    pub new_status: TestCaseStatus,
}

/// CSV export of test cases.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestCasesCsvResponse {
    pub filename: String,
    pub content: String,
    pub total_test_cases: usize,
}
