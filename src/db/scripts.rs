//! Database queries for automation scripts.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::script::{self, ActiveModel, Entity as Script};
use crate::error::{AppError, AppResult};
use crate::models::ScriptType;

use super::DbPool;

impl DbPool {
    /// Insert a generated script.
    pub async fn insert_script(
        &self,
        input_source_id: Uuid,
        name: String,
        script_type: ScriptType,
        content: String,
    ) -> AppResult<script::Model> {
        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            input_source_id: Set(input_source_id),
            name: Set(name),
            script_type: Set(script_type.as_str().to_string()),
            content: Set(content),
            created_at: Set(Utc::now()),
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert script: {}", e)))
    }

    /// Get a script by ID.
    pub async fn get_script(&self, id: Uuid) -> AppResult<Option<script::Model>> {
        Script::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get script: {}", e)))
    }

    /// List scripts for an input source, newest first.
    pub async fn list_scripts_for_source(
        &self,
        input_source_id: Uuid,
    ) -> AppResult<Vec<script::Model>> {
        Script::find()
            .filter(script::Column::InputSourceId.eq(input_source_id))
            .order_by_desc(script::Column::CreatedAt)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list scripts: {}", e)))
    }

    /// Delete a script. Returns false if it did not exist.
    pub async fn delete_script(&self, id: Uuid) -> AppResult<bool> {
        let result = Script::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete script: {}", e)))?;

        Ok(result.rows_affected > 0)
    }
}
