//! Script entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "scripts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub input_source_id: Uuid,
    pub name: String,
    /// playwright_python, playwright_selenium
    pub script_type: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created_at: DateTimeUtc,
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
