//! Domain models and DTOs for the test generation server.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod input_source;
pub mod script;
pub mod test_case;
pub mod test_run;

// Re-export commonly used types
pub use input_source::{
    CreateUserPromptRequest, InputSourceResponse, InputSourceSummary, SourceType,
    UpdateInputSourceRequest,
};
pub use script::{
    ExecuteScriptResponse, GenerateScriptQuery, GenerateScriptResponse, ScriptExecutionResult,
    ScriptExecutionStatus, ScriptSummary, ScriptType,
};
pub use test_case::{
    CreateTestCaseRequest, GenerateTestCasesResponse, GeneratedTestCase, ManualTestCase,
    ManualTestCasesResponse, Steps, TestCaseResponse, TestCaseStatus, TestCasesCsvResponse,
    UpdateStatusQuery, UpdateStatusResponse, UpdateTestCaseRequest,
};
pub use test_run::{
    CaseExecutionResult, ExecuteTestCasesResponse, ExecutionResults, RunSummary,
    TestRunResponse, TestRunStatus, TestRunsCsvResponse,
};

/// Where generated content came from.
///
/// Lets callers tell live model output apart from substituted content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContentOrigin {
    /// Produced by the chat-completion model and interpreted successfully.
    Generated,
    /// The model answered but its output could not be interpreted.
    Placeholder,
    /// No API key configured; built-in sample content.
    Sample,
}

/// Plain acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}
