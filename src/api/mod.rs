//! API endpoint modules.

pub mod health;
pub mod input_sources;
pub mod manual_testing;
pub mod openapi;
pub mod script_output;
pub mod test_generation;

use actix_web::{error, web};

use crate::db::DbPool;
use crate::error::AppError;
use crate::services::{SwaggerFetcher, TestExecutor, TestGenerator};

pub use health::configure_health_routes;
pub use openapi::ApiDoc;

/// Maximum accepted size of one multipart field, in bytes.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimit(pub usize);

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppServices {
    pub pool: web::Data<DbPool>,
    pub generator: web::Data<TestGenerator>,
    pub executor: web::Data<TestExecutor>,
    pub fetcher: web::Data<SwaggerFetcher>,
    pub upload_limit: web::Data<UploadLimit>,
}

impl AppServices {
    pub fn new(
        pool: DbPool,
        generator: TestGenerator,
        executor: TestExecutor,
        fetcher: SwaggerFetcher,
        max_upload_size: usize,
    ) -> Self {
        Self {
            pool: web::Data::new(pool),
            generator: web::Data::new(generator),
            executor: web::Data::new(executor),
            fetcher: web::Data::new(fetcher),
            upload_limit: web::Data::new(UploadLimit(max_upload_size)),
        }
    }

    /// Register app data, extractor error handlers, health probes and `/api` routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.pool.clone())
            .app_data(self.generator.clone())
            .app_data(self.executor.clone())
            .app_data(self.fetcher.clone())
            .app_data(self.upload_limit.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                error::Error::from(AppError::InvalidInput(err.to_string()))
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                error::Error::from(AppError::InvalidInput(err.to_string()))
            }))
            .app_data(web::PathConfig::default().error_handler(|err, _req| {
                error::Error::from(AppError::InvalidInput(err.to_string()))
            }))
            .configure(configure_health_routes)
            .service(
                web::scope("/api")
                    .configure(input_sources::configure_routes)
                    .configure(test_generation::configure_routes)
                    .configure(script_output::configure_routes)
                    .configure(manual_testing::configure_routes),
            );
    }
}
