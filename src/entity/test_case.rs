//! TestCase entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "test_cases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub input_source_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Newline-delimited steps.
    #[sea_orm(column_type = "Text")]
    pub steps: String,
    #[sea_orm(column_type = "Text")]
    pub expected_result: String,
    pub status: String,
    pub is_automated: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::input_source::Entity",
        from = "Column::InputSourceId",
        to = "super::input_source::Column::Id",
        on_delete = "Cascade"
    )]
    InputSource,
}

impl Related<super::input_source::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InputSource.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
