//! Create scripts table.

use sea_orm_migration::prelude::*;

use super::m20260101_000001_create_input_sources::InputSource;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Script::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Script::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Script::InputSourceId).uuid().not_null())
                    .col(ColumnDef::new(Script::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Script::ScriptType).string_len(32).not_null())
                    .col(ColumnDef::new(Script::Content).text().not_null())
                    .col(
                        ColumnDef::new(Script::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scripts_input_source")
                            .from(Script::Table, Script::InputSourceId)
                            .to(InputSource::Table, InputSource::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scripts_input_source_id")
                    .table(Script::Table)
                    .col(Script::InputSourceId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Script::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Script {
    #[sea_orm(iden = "scripts")]
    Table,
    Id,
    InputSourceId,
    Name,
    ScriptType,
    Content,
    CreatedAt,
}
