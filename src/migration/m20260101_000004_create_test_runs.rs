//! Create test_runs table.

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
                    .table(TestRun::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TestRun::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(TestRun::InputSourceId).uuid().not_null())
                    .col(ColumnDef::new(TestRun::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(TestRun::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(TestRun::TotalTests)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TestRun::PassedTests)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TestRun::FailedTests)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(TestRun::ResultsSummary).text())
                    .col(
                        ColumnDef::new(TestRun::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TestRun::CompletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_test_runs_input_source")
                            .from(TestRun::Table, TestRun::InputSourceId)
                            .to(InputSource::Table, InputSource::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_runs_input_source_id")
                    .table(TestRun::Table)
                    .col(TestRun::InputSourceId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestRun::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TestRun {
    #[sea_orm(iden = "test_runs")]
    Table,
    Id,
    InputSourceId,
    Name,
    Status,
    TotalTests,
    PassedTests,
    FailedTests,
    ResultsSummary,
    StartedAt,
    CompletedAt,
}
