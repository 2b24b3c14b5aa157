//! CSV export and download file naming.

use chrono::{DateTime, Utc};

use crate::entity::{test_case, test_run};
use crate::error::{AppError, AppResult};
use crate::models::test_run::success_rate;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FILENAME_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

const TEST_CASE_HEADER: [&str; 7] = [
    "Test Case ID",
    "Title",
    "Description",
    "Steps",
    "Expected Result",
    "Status",
    "Created At",
];

const TEST_RUN_HEADER: [&str; 9] = [
    "Test Run ID",
    "Name",
    "Status",
    "Total Tests",
    "Passed Tests",
    "Failed Tests",
    "Success Rate (%)",
    "Started At",
    "Completed At",
];

fn finish(writer: csv::Writer<Vec<u8>>) -> AppResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to flush CSV: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV is not UTF-8: {}", e)))
}

/// Render test cases as CSV with a header row.
pub fn test_cases_csv(cases: &[test_case::Model]) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(TEST_CASE_HEADER)?;

    for case in cases {
        writer.write_record([
            case.id.to_string(),
            case.title.clone(),
            case.description.clone(),
            case.steps.clone(),
            case.expected_result.clone(),
            case.status.clone(),
            case.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ])?;
    }

    finish(writer)
}

/// Render test runs as CSV with a header row.
pub fn test_runs_csv(runs: &[test_run::Model]) -> AppResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(TEST_RUN_HEADER)?;

    for run in runs {
        let rate = success_rate(
            u32::try_from(run.passed_tests).unwrap_or(0),
            u32::try_from(run.total_tests).unwrap_or(0),
        );
        writer.write_record([
            run.id.to_string(),
            run.name.clone(),
            run.status.clone(),
            run.total_tests.to_string(),
            run.passed_tests.to_string(),
            run.failed_tests.to_string(),
            format!("{:.1}", rate),
            run.started_at.format(TIMESTAMP_FORMAT).to_string(),
            run.completed_at
                .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_default(),
        ])?;
    }

    finish(writer)
}

/// `{prefix}_{name}_{YYYYmmdd_HHMMSS}.csv`
pub fn export_filename(prefix: &str, source_name: &str, at: DateTime<Utc>) -> String {
    format!(
        "{}_{}_{}.csv",
        prefix,
        sanitize_filename(source_name),
        at.format(FILENAME_TIMESTAMP_FORMAT)
    )
}

/// Keep alphanumerics, space, `-` and `_`; trim the end and turn spaces into `_`.
pub fn sanitize_filename(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();

    let cleaned = kept.trim_end().replace(' ', "_");
    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned
    }
}

/// Download name for a script.
pub fn script_filename(name: &str, extension: &str) -> String {
    format!("{}.{}", sanitize_filename(name), extension)
}
