//! CLI tool to create or upgrade the database schema.
//!
//! Usage:
//!   testgen-init-db            Apply pending migrations
//!   testgen-init-db status     List applied and pending migrations

use std::env;

use sea_orm_migration::MigratorTrait;

use testgen_lib::config::Config;
use testgen_lib::db::DbPool;
use testgen_lib::migration::Migrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let command = env::args().nth(1).unwrap_or_else(|| "up".to_string());

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match DbPool::connect(&config.database_url, 1, 1).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error connecting to database: {}", e);
            std::process::exit(1);
        }
    };

    match command.as_str() {
        "up" => {
            if let Err(e) = pool.run_migrations().await {
                eprintln!("Error running migrations: {}", e);
                std::process::exit(1);
            }
            println!("Database schema is up to date");
        }
        "status" => {
            if let Err(e) = Migrator::status(pool.connection()).await {
                eprintln!("Error reading migration status: {}", e);
                std::process::exit(1);
            }
        }
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: testgen-init-db [command]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  up        Apply pending migrations (default)");
    eprintln!("  status    Show applied and pending migrations");
    eprintln!("  help      Show this help");
    eprintln!();
}
