//! Test run domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::TestCaseStatus;
use crate::entity::test_run;

/// Test run status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TestRunStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl TestRunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for TestRunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one simulated test case.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CaseExecutionResult {
    /// 1-based position in the executed batch.
    pub position: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_case_id: Option<Uuid>,
    pub title: String,
    pub status: TestCaseStatus,
    /// Reported run time in seconds.
    pub execution_time: f64,
    pub error_message: Option<String>,
}

/// Aggregate result of a simulated batch.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExecutionResults {
    pub total_tests: u32,
    pub passed_tests: u32,
    pub failed_tests: u32,
    /// Wall-clock time of the batch in seconds.
    pub execution_time: f64,
    pub test_results: Vec<CaseExecutionResult>,
}

impl ExecutionResults {
    /// Percentage of passed tests; 0 for an empty batch.
    pub fn success_rate(&self) -> f64 {
        success_rate(self.passed_tests, self.total_tests)
    }
}

/// Percentage of `passed` in `total`, 0 when `total` is 0.
pub fn success_rate(passed: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(passed) / f64::from(total) * 100.0
    }
}

/// Short numeric summary of a run.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RunSummary {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub success_rate: f64,
}

impl From<&ExecutionResults> for RunSummary {
    fn from(r: &ExecutionResults) -> Self {
        RunSummary {
            total: r.total_tests,
            passed: r.passed_tests,
            failed: r.failed_tests,
            success_rate: r.success_rate(),
        }
    }
}

/// Response after executing test cases.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExecuteTestCasesResponse {
    pub test_run_id: Uuid,
    pub execution_results: ExecutionResults,
    pub summary: RunSummary,
}

/// Stored test run representation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestRunResponse {
    pub id: Uuid,
    pub input_source_id: Uuid,
    pub name: String,
    pub status: TestRunStatus,
    pub total_tests: i32,
    pub passed_tests: i32,
    pub failed_tests: i32,
    pub results_summary: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<test_run::Model> for TestRunResponse {
    fn from(m: test_run::Model) -> Self {
        TestRunResponse {
            id: m.id,
            input_source_id: m.input_source_id,
            status: TestRunStatus::parse(&m.status).unwrap_or(TestRunStatus::Pending),
            name: m.name,
            total_tests: m.total_tests,
            passed_tests: m.passed_tests,
            failed_tests: m.failed_tests,
            results_summary: m.results_summary,
            started_at: m.started_at,
            completed_at: m.completed_at,
        }
    }
}

/// CSV export of test runs.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestRunsCsvResponse {
    pub filename: String,
    pub content: String,
    pub total_test_runs: usize,
}
