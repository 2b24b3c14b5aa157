//! Database queries for test runs.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::test_run::{self, ActiveModel, Entity as TestRun};
use crate::error::{AppError, AppResult};
use crate::models::{ExecutionResults, TestRunStatus};

use super::DbPool;

impl DbPool {
    /// Store a finished run with its final counts.
    ///
    /// Runs are written once, after execution, so a stored row always has
    /// `total_tests = passed_tests + failed_tests`. `report` becomes the
    /// results summary.
    pub async fn record_test_run(
        &self,
        input_source_id: Uuid,
        name: String,
        started_at: DateTime<Utc>,
        results: &ExecutionResults,
        report: String,
    ) -> AppResult<test_run::Model> {
        let passed = to_i32(results.passed_tests);
        let failed = to_i32(results.failed_tests);

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            input_source_id: Set(input_source_id),
            name: Set(name),
            status: Set(TestRunStatus::Completed.as_str().to_string()),
            total_tests: Set(passed.saturating_add(failed)),
            passed_tests: Set(passed),
            failed_tests: Set(failed),
            results_summary: Set(Some(report)),
            started_at: Set(started_at),
            completed_at: Set(Some(Utc::now())),
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to record test run: {}", e)))
    }

    /// List runs for an input source, newest first.
    pub async fn list_test_runs_for_source(
        &self,
        input_source_id: Uuid,
    ) -> AppResult<Vec<test_run::Model>> {
        TestRun::find()
            .filter(test_run::Column::InputSourceId.eq(input_source_id))
            .order_by_desc(test_run::Column::StartedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list test runs: {}", e)))
    }

    /// Delete a test run. Returns false if it did not exist.
    pub async fn delete_test_run(&self, id: Uuid) -> AppResult<bool> {
        let result = TestRun::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete test run: {}", e)))?;

        Ok(result.rows_affected > 0)
    }
}

fn to_i32(n: u32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
