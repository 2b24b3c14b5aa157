//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20260101_000001_create_input_sources;
mod m20260101_000002_create_test_cases;
mod m20260101_000003_create_scripts;
mod m20260101_000004_create_test_runs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_input_sources::Migration),
            Box::new(m20260101_000002_create_test_cases::Migration),
            Box::new(m20260101_000003_create_scripts::Migration),
            Box::new(m20260101_000004_create_test_runs::Migration),
        ]
    }
}
