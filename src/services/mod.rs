//! Business logic services.

pub mod execution;
pub mod export;
pub mod generation;
pub mod swagger;

pub use execution::{TestExecutor, execution_report};
pub use generation::{GenerationOutcome, TestGenerator};
pub use swagger::{SwaggerDocument, SwaggerFetcher};
