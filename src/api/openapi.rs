//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models, services};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Test Generation Server",
        version = "0.1.0",
        description = "Generates test cases and automation scripts from user stories, Swagger documents and plain text"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::root,
        api::health::health,
        api::health::ready,
        // Input source endpoints
        api::input_sources::list_input_sources,
        api::input_sources::get_input_source,
        api::input_sources::update_input_source,
        api::input_sources::delete_input_source,
        api::input_sources::create_user_prompt,
        api::input_sources::upload_swagger,
        api::input_sources::create_from_swagger_url,
        // Test generation endpoints
        api::test_generation::generate_test_cases,
        api::test_generation::execute_test_cases,
        api::test_generation::list_test_cases,
        api::test_generation::create_test_case,
        api::test_generation::update_test_case,
        api::test_generation::delete_test_case,
        api::test_generation::list_test_runs,
        api::test_generation::delete_test_run,
        // Script endpoints
        api::script_output::generate_script,
        api::script_output::execute_script,
        api::script_output::list_scripts,
        api::script_output::download_script,
        api::script_output::delete_script,
        // Manual testing endpoints
        api::manual_testing::get_manual_test_cases,
        api::manual_testing::update_test_case_status,
        api::manual_testing::export_test_cases_csv,
        api::manual_testing::export_test_runs_csv,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            models::MessageResponse,
            models::ContentOrigin,
            // Health
            api::health::RootResponse,
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Input sources
            models::SourceType,
            models::CreateUserPromptRequest,
            models::UpdateInputSourceRequest,
            models::InputSourceResponse,
            models::InputSourceSummary,
            api::input_sources::SwaggerSourceResponse,
            services::swagger::Endpoint,
            // Test cases
            models::TestCaseStatus,
            models::GeneratedTestCase,
            models::TestCaseResponse,
            models::GenerateTestCasesResponse,
            models::CreateTestCaseRequest,
            models::UpdateTestCaseRequest,
            models::ManualTestCase,
            models::ManualTestCasesResponse,
            models::UpdateStatusQuery,
            models::UpdateStatusResponse,
            models::TestCasesCsvResponse,
            // Test runs
            models::TestRunStatus,
            models::CaseExecutionResult,
            models::ExecutionResults,
            models::RunSummary,
            models::ExecuteTestCasesResponse,
            models::TestRunResponse,
            models::TestRunsCsvResponse,
            // Scripts
            models::ScriptType,
            models::GenerateScriptQuery,
            models::GenerateScriptResponse,
            models::ScriptSummary,
            models::ScriptExecutionStatus,
            models::ScriptExecutionResult,
            models::ExecuteScriptResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Input Sources", description = "User stories, Swagger documents and plain text prompts"),
        (name = "Test Generation", description = "Generate, execute and manage test cases"),
        (name = "Script Output", description = "Generate, run and download automation scripts"),
        (name = "Manual Testing", description = "Manual status updates and CSV exports")
    )
)]
pub struct ApiDoc;
