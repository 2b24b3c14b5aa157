//! Test generation, execution and test case management handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::db::DbPool;
use crate::db::test_cases::TestCaseChanges;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateTestCaseRequest, ExecuteTestCasesResponse, GenerateTestCasesResponse, GeneratedTestCase,
    MessageResponse, RunSummary, SourceType, TestCaseResponse, TestRunResponse,
    UpdateTestCaseRequest,
};
use crate::services::{TestExecutor, TestGenerator, execution_report};

pub(crate) const NO_TEST_CASES: &str = "No test cases found for this input source";

/// Generate test cases for an input source and store them.
#[utoipa::path(
    post,
    path = "/api/test-generation/generate/{input_source_id}",
    tag = "Test Generation",
    params(("input_source_id" = Uuid, Path, description = "Input source ID")),
    responses(
        (status = 200, description = "Test cases generated", body = GenerateTestCasesResponse),
        (status = 404, description = "Input source not found", body = crate::error::ErrorResponse),
        (status = 502, description = "Completion provider failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn generate_test_cases(
    pool: web::Data<DbPool>,
    generator: web::Data<TestGenerator>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let input_source_id = path.into_inner();
    let source = pool.require_input_source(input_source_id).await?;
    let source_type = SourceType::parse(&source.source_type).unwrap_or(SourceType::PlainText);

    let (origin, records) = generator
        .generate_test_cases(&source.content, source_type)
        .await
        .into_records()?;

    let saved = pool.insert_test_cases(input_source_id, &records).await?;

    info!(
        input_source_id = %input_source_id,
        records = saved.len(),
        origin = ?origin,
        "Stored generated test cases"
    );

    Ok(HttpResponse::Ok().json(GenerateTestCasesResponse {
        message: format!("Generated {} test cases", saved.len()),
        input_source_id,
        origin,
        test_cases: saved.into_iter().map(Into::into).collect(),
    }))
}

/// Simulate executing every test case of an input source and record the run.
#[utoipa::path(
    post,
    path = "/api/test-generation/execute/{input_source_id}",
    tag = "Test Generation",
    params(("input_source_id" = Uuid, Path, description = "Input source ID")),
    responses(
        (status = 200, description = "Execution finished", body = ExecuteTestCasesResponse),
        (status = 404, description = "Input source or test cases not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn execute_test_cases(
    pool: web::Data<DbPool>,
    executor: web::Data<TestExecutor>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let input_source_id = path.into_inner();
    pool.require_input_source(input_source_id).await?;

    let cases = pool.list_test_cases_for_source(input_source_id).await?;
    if cases.is_empty() {
        return Err(AppError::NotFound(NO_TEST_CASES.to_string()));
    }

    let started_at = Utc::now();
    let results = executor.execute_test_cases(&cases).await;
    let run = pool
        .record_test_run(
            input_source_id,
            format!("Test Run for Input Source {}", input_source_id),
            started_at,
            &results,
            execution_report(&results),
        )
        .await?;

    Ok(HttpResponse::Ok().json(ExecuteTestCasesResponse {
        test_run_id: run.id,
        summary: RunSummary::from(&results),
        execution_results: results,
    }))
}

#[utoipa::path(
    get,
    path = "/api/test-generation/test-cases/{input_source_id}",
    tag = "Test Generation",
    params(("input_source_id" = Uuid, Path, description = "Input source ID")),
    responses(
        (status = 200, description = "Test cases in creation order", body = Vec<TestCaseResponse>),
        (status = 404, description = "Input source not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_test_cases(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let input_source_id = path.into_inner();
    pool.require_input_source(input_source_id).await?;

    let cases = pool.list_test_cases_for_source(input_source_id).await?;
    let response: Vec<TestCaseResponse> = cases.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// Author a test case by hand.
#[utoipa::path(
    post,
    path = "/api/test-generation/test-cases/{input_source_id}",
    tag = "Test Generation",
    params(("input_source_id" = Uuid, Path, description = "Input source ID")),
    request_body = CreateTestCaseRequest,
    responses(
        (status = 201, description = "Test case created", body = TestCaseResponse),
        (status = 400, description = "Blank title", body = crate::error::ErrorResponse),
        (status = 404, description = "Input source not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_test_case(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<CreateTestCaseRequest>,
) -> AppResult<HttpResponse> {
    let input_source_id = path.into_inner();
    let req = body.into_inner();

    let record = GeneratedTestCase::new(
        req.title.trim(),
        req.description,
        req.steps.into_vec(),
        req.expected_result,
    )?;
    pool.require_input_source(input_source_id).await?;

    let saved = pool
        .insert_test_case(input_source_id, &record, req.is_automated)
        .await?;

    info!(input_source_id = %input_source_id, test_case_id = %saved.id, "Test case created");
    Ok(HttpResponse::Created().json(TestCaseResponse::from(saved)))
}

#[utoipa::path(
    put,
    path = "/api/test-generation/test-cases/{test_case_id}",
    tag = "Test Generation",
    params(("test_case_id" = Uuid, Path, description = "Test case ID")),
    request_body = UpdateTestCaseRequest,
    responses(
        (status = 200, description = "Test case updated", body = TestCaseResponse),
        (status = 400, description = "Blank title", body = crate::error::ErrorResponse),
        (status = 404, description = "Test case not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_test_case(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateTestCaseRequest>,
) -> AppResult<HttpResponse> {
    let test_case_id = path.into_inner();
    let req = body.into_inner();

    let title = match req.title {
        Some(title) if title.trim().is_empty() => {
            return Err(AppError::InvalidInput(
                "test case title must not be empty".to_string(),
            ));
        }
        Some(title) => Some(title.trim().to_string()),
        None => None,
    };

    let changes = TestCaseChanges {
        title,
        description: req.description,
        steps: req.steps.map(|s| s.into_vec()),
        expected_result: req.expected_result,
        status: req.status,
        is_automated: req.is_automated,
    };

    let updated = pool
        .update_test_case(test_case_id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound("Test case not found".to_string()))?;

    Ok(HttpResponse::Ok().json(TestCaseResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/test-generation/test-cases/{test_case_id}",
    tag = "Test Generation",
    params(("test_case_id" = Uuid, Path, description = "Test case ID")),
    responses(
        (status = 200, description = "Test case deleted", body = MessageResponse),
        (status = 404, description = "Test case not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_test_case(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    if !pool.delete_test_case(path.into_inner()).await? {
        return Err(AppError::NotFound("Test case not found".to_string()));
    }
    Ok(HttpResponse::Ok().json(MessageResponse::new("Test case deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/test-generation/test-runs/{input_source_id}",
    tag = "Test Generation",
    params(("input_source_id" = Uuid, Path, description = "Input source ID")),
    responses(
        (status = 200, description = "Test runs, newest first", body = Vec<TestRunResponse>),
        (status = 404, description = "Input source not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_test_runs(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let input_source_id = path.into_inner();
    pool.require_input_source(input_source_id).await?;

    let runs = pool.list_test_runs_for_source(input_source_id).await?;
    let response: Vec<TestRunResponse> = runs.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(response))
}

#[utoipa::path(
    delete,
    path = "/api/test-generation/test-runs/{test_run_id}",
    tag = "Test Generation",
    params(("test_run_id" = Uuid, Path, description = "Test run ID")),
    responses(
        (status = 200, description = "Test run deleted", body = MessageResponse),
        (status = 404, description = "Test run not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_test_run(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    if !pool.delete_test_run(path.into_inner()).await? {
        return Err(AppError::NotFound("Test run not found".to_string()));
    }
    Ok(HttpResponse::Ok().json(MessageResponse::new("Test run deleted successfully")))
}

/// Configure test generation routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/test-generation")
            .service(
                web::resource("/generate/{input_source_id}")
                    .route(web::post().to(generate_test_cases)),
            )
            .service(
                web::resource("/execute/{input_source_id}")
                    .route(web::post().to(execute_test_cases)),
            )
            // GET/POST take an input source ID, PUT/DELETE a test case ID
            .service(
                web::resource("/test-cases/{id}")
                    .route(web::get().to(list_test_cases))
                    .route(web::post().to(create_test_case))
                    .route(web::put().to(update_test_case))
                    .route(web::delete().to(delete_test_case)),
            )
            .service(
                web::resource("/test-runs/{id}")
                    .route(web::get().to(list_test_runs))
                    .route(web::delete().to(delete_test_run)),
            ),
    );
}
