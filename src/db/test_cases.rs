//! Database queries for test cases.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::test_case::{self, ActiveModel, Entity as TestCase};
use crate::error::{AppError, AppResult};
use crate::models::test_case::join_steps;
use crate::models::{GeneratedTestCase, TestCaseStatus};

use super::DbPool;

/// Column changes for a partial test case update.
#[derive(Debug, Clone, Default)]
pub struct TestCaseChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub steps: Option<Vec<String>>,
    pub expected_result: Option<String>,
    pub status: Option<TestCaseStatus>,
    pub is_automated: Option<bool>,
}

fn new_active_model(
    input_source_id: Uuid,
    record: &GeneratedTestCase,
    is_automated: bool,
    now: chrono::DateTime<Utc>,
) -> ActiveModel {
    ActiveModel {
        id: Set(Uuid::now_v7()),
        input_source_id: Set(input_source_id),
        title: Set(record.title.clone()),
        description: Set(record.description.clone()),
        steps: Set(record.steps_text()),
        expected_result: Set(record.expected_result.clone()),
        status: Set(TestCaseStatus::Pending.as_str().to_string()),
        is_automated: Set(is_automated),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

impl DbPool {
    /// Insert a batch of test cases for one input source in a single transaction.
    ///
    /// Either every record is stored or none is.
    pub async fn insert_test_cases(
        &self,
        input_source_id: Uuid,
        records: &[GeneratedTestCase],
    ) -> AppResult<Vec<test_case::Model>> {
        let now = Utc::now();
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let mut inserted = Vec::with_capacity(records.len());
        for record in records {
            let model = new_active_model(input_source_id, record, false, now)
                .insert(&txn)
                .await
                .map_err(|e| AppError::Database(format!("Failed to insert test case: {}", e)))?;
            inserted.push(model);
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit test cases: {}", e)))?;

        Ok(inserted)
    }

    /// Insert one hand-authored test case.
    pub async fn insert_test_case(
        &self,
        input_source_id: Uuid,
        record: &GeneratedTestCase,
        is_automated: bool,
    ) -> AppResult<test_case::Model> {
        new_active_model(input_source_id, record, is_automated, Utc::now())
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test case: {}", e)))
    }

    /// Get a test case by ID.
    pub async fn get_test_case(&self, id: Uuid) -> AppResult<Option<test_case::Model>> {
        TestCase::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test case: {}", e)))
    }

    /// List test cases for an input source in creation order.
    pub async fn list_test_cases_for_source(
        &self,
        input_source_id: Uuid,
    ) -> AppResult<Vec<test_case::Model>> {
        TestCase::find()
            .filter(test_case::Column::InputSourceId.eq(input_source_id))
            .order_by_asc(test_case::Column::CreatedAt)
            .order_by_asc(test_case::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list test cases: {}", e)))
    }

    /// Apply a partial update. Returns `None` if the test case does not exist.
    pub async fn update_test_case(
        &self,
        id: Uuid,
        changes: TestCaseChanges,
    ) -> AppResult<Option<test_case::Model>> {
        let Some(existing) = self.get_test_case(id).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(steps) = changes.steps {
            active.steps = Set(join_steps(&steps));
        }
        if let Some(expected_result) = changes.expected_result {
            active.expected_result = Set(expected_result);
        }
        if let Some(status) = changes.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(is_automated) = changes.is_automated {
            active.is_automated = Set(is_automated);
        }
        active.updated_at = Set(Utc::now());

        let updated = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update test case: {}", e)))?;

        Ok(Some(updated))
    }

    /// Set the status of a test case. Returns `None` if it does not exist.
    pub async fn update_test_case_status(
        &self,
        id: Uuid,
        status: TestCaseStatus,
    ) -> AppResult<Option<test_case::Model>> {
        self.update_test_case(
            id,
            TestCaseChanges {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
    }

    /// Delete a test case. Returns false if it did not exist.
    pub async fn delete_test_case(&self, id: Uuid) -> AppResult<bool> {
        let result = TestCase::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete test case: {}", e)))?;

        Ok(result.rows_affected > 0)
    }
}
