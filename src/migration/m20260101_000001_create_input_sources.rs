//! Create input_sources table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InputSource::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InputSource::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InputSource::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(InputSource::SourceType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(InputSource::Content).text().not_null())
                    .col(ColumnDef::new(InputSource::SourceUrl).string_len(2048))
                    .col(
                        ColumnDef::new(InputSource::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InputSource::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_input_sources_created_at")
                    .table(InputSource::Table)
                    .col(InputSource::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InputSource::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum InputSource {
    #[sea_orm(iden = "input_sources")]
    Table,
    Id,
    Name,
    SourceType,
    Content,
    SourceUrl,
    CreatedAt,
    UpdatedAt,
}
