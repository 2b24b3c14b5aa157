//! Create test_cases table.

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
                    .table(TestCase::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TestCase::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(TestCase::InputSourceId).uuid().not_null())
                    .col(ColumnDef::new(TestCase::Title).string_len(500).not_null())
                    .col(ColumnDef::new(TestCase::Description).text().not_null())
                    .col(ColumnDef::new(TestCase::Steps).text().not_null())
                    .col(ColumnDef::new(TestCase::ExpectedResult).text().not_null())
                    .col(
                        ColumnDef::new(TestCase::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(TestCase::IsAutomated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(TestCase::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TestCase::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_test_cases_input_source")
                            .from(TestCase::Table, TestCase::InputSourceId)
                            .to(InputSource::Table, InputSource::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_cases_input_source_id")
                    .table(TestCase::Table)
                    .col(TestCase::InputSourceId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestCase::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TestCase {
    #[sea_orm(iden = "test_cases")]
    Table,
    Id,
    InputSourceId,
    Title,
    Description,
    Steps,
    ExpectedResult,
    Status,
    IsAutomated,
    CreatedAt,
    UpdatedAt,
}
