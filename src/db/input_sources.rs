//! Database queries for input sources.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::input_source::{self, ActiveModel, Entity as InputSource};
use crate::entity::{script, test_case, test_run};
use crate::error::{AppError, AppResult};
use crate::models::SourceType;

use super::DbPool;

/// Fields for a new input source.
#[derive(Debug, Clone)]
pub struct NewInputSource {
    pub name: String,
    pub source_type: SourceType,
    pub content: String,
    pub source_url: Option<String>,
}

impl DbPool {
    /// Insert a new input source.
    pub async fn insert_input_source(&self, new: NewInputSource) -> AppResult<input_source::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(new.name),
            source_type: Set(new.source_type.as_str().to_string()),
            content: Set(new.content),
            source_url: Set(new.source_url),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert input source: {}", e)))
    }

    /// Get an input source by ID.
    pub async fn get_input_source(&self, id: Uuid) -> AppResult<Option<input_source::Model>> {
        InputSource::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get input source: {}", e)))
    }

    /// Get an input source or fail with not found.
    pub async fn require_input_source(&self, id: Uuid) -> AppResult<input_source::Model> {
        self.get_input_source(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Input source not found".to_string()))
    }

    /// List all input sources, newest first.
    pub async fn list_input_sources(&self) -> AppResult<Vec<input_source::Model>> {
        InputSource::find()
            .order_by_desc(input_source::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list input sources: {}", e)))
    }

    /// Apply a partial update. Returns `None` if the source does not exist.
    pub async fn update_input_source(
        &self,
        id: Uuid,
        name: Option<String>,
        source_type: Option<SourceType>,
        content: Option<String>,
    ) -> AppResult<Option<input_source::Model>> {
        let Some(existing) = self.get_input_source(id).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(source_type) = source_type {
            active.source_type = Set(source_type.as_str().to_string());
        }
        if let Some(content) = content {
            active.content = Set(content);
        }
        active.updated_at = Set(Utc::now());

        let updated = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update input source: {}", e)))?;

        Ok(Some(updated))
    }

    /// Delete an input source together with its test cases, scripts and runs.
    ///
    /// Returns false if nothing was deleted.
    pub async fn delete_input_source(&self, id: Uuid) -> AppResult<bool> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        test_case::Entity::delete_many()
            .filter(test_case::Column::InputSourceId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete test cases: {}", e)))?;

        script::Entity::delete_many()
            .filter(script::Column::InputSourceId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete scripts: {}", e)))?;

        test_run::Entity::delete_many()
            .filter(test_run::Column::InputSourceId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete test runs: {}", e)))?;

        let result = InputSource::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete input source: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit delete: {}", e)))?;

        Ok(result.rows_affected > 0)
    }
}
