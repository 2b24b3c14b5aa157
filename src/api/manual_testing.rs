//! Manual testing handlers: status updates and CSV exports.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    InputSourceSummary, ManualTestCase, ManualTestCasesResponse, TestCaseStatus,
    TestCasesCsvResponse, TestRunsCsvResponse, UpdateStatusQuery, UpdateStatusResponse,
};
use crate::services::export;

fn invalid_status_message() -> String {
    let valid: Vec<&str> = TestCaseStatus::ALL.iter().map(|s| s.as_str()).collect();
    format!("Invalid status. Must be one of: {}", valid.join(", "))
}

/// Test cases of an input source laid out for manual testing.
#[utoipa::path(
    get,
    path = "/api/manual-testing/manual-test-cases/{input_source_id}",
    tag = "Manual Testing",
    params(("input_source_id" = Uuid, Path, description = "Input source ID")),
    responses(
        (status = 200, description = "Manual test cases", body = ManualTestCasesResponse),
        (status = 404, description = "Input source not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_manual_test_cases(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let input_source_id = path.into_inner();
    let source = pool.require_input_source(input_source_id).await?;
    let cases = pool.list_test_cases_for_source(input_source_id).await?;

    let test_cases: Vec<ManualTestCase> = cases.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(ManualTestCasesResponse {
        input_source: InputSourceSummary::from(&source),
        total_count: test_cases.len(),
        test_cases,
    }))
}

/// Record the outcome of a manually executed test case.
#[utoipa::path(
    post,
    path = "/api/manual-testing/update-test-case-status/{test_case_id}",
    tag = "Manual Testing",
    params(
        ("test_case_id" = Uuid, Path, description = "Test case ID"),
        ("status" = String, Query, description = "pending, passed, failed or running")
    ),
    responses(
        (status = 200, description = "Status updated", body = UpdateStatusResponse),
        (status = 400, description = "Invalid status", body = crate::error::ErrorResponse),
        (status = 404, description = "Test case not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_test_case_status(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    query: web::Query<UpdateStatusQuery>,
) -> AppResult<HttpResponse> {
    let test_case_id = path.into_inner();

    pool.get_test_case(test_case_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Test case not found".to_string()))?;

    let status = TestCaseStatus::parse(query.status.trim())
        .ok_or_else(|| AppError::InvalidInput(invalid_status_message()))?;

    pool.update_test_case_status(test_case_id, status)
        .await?
        .ok_or_else(|| AppError::NotFound("Test case not found".to_string()))?;

    info!(test_case_id = %test_case_id, status = %status, "Test case status updated");
    Ok(HttpResponse::Ok().json(UpdateStatusResponse {
        message: format!("Test case status updated to {}", status),
        test_case_id,
        new_status: status,
    }))
}

#[utoipa::path(
    get,
    path = "/api/manual-testing/test-cases/{input_source_id}/csv",
    tag = "Manual Testing",
    params(("input_source_id" = Uuid, Path, description = "Input source ID")),
    responses(
        (status = 200, description = "CSV export", body = TestCasesCsvResponse),
        (status = 404, description = "Input source or test cases not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn export_test_cases_csv(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let input_source_id = path.into_inner();
    let source = pool.require_input_source(input_source_id).await?;
    let cases = pool.list_test_cases_for_source(input_source_id).await?;
    if cases.is_empty() {
        return Err(AppError::NotFound("No test cases found".to_string()));
    }

    Ok(HttpResponse::Ok().json(TestCasesCsvResponse {
        filename: export::export_filename("test_cases", &source.name, Utc::now()),
        content: export::test_cases_csv(&cases)?,
        total_test_cases: cases.len(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/manual-testing/test-runs/{input_source_id}/csv",
    tag = "Manual Testing",
    params(("input_source_id" = Uuid, Path, description = "Input source ID")),
    responses(
        (status = 200, description = "CSV export", body = TestRunsCsvResponse),
        (status = 404, description = "Input source or test runs not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn export_test_runs_csv(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let input_source_id = path.into_inner();
    let source = pool.require_input_source(input_source_id).await?;
    let runs = pool.list_test_runs_for_source(input_source_id).await?;
    if runs.is_empty() {
        return Err(AppError::NotFound("No test runs found".to_string()));
    }

    Ok(HttpResponse::Ok().json(TestRunsCsvResponse {
        filename: export::export_filename("test_runs", &source.name, Utc::now()),
        content: export::test_runs_csv(&runs)?,
        total_test_runs: runs.len(),
    }))
}

/// Configure manual testing routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/manual-testing")
            .service(
                web::resource("/manual-test-cases/{input_source_id}")
                    .route(web::get().to(get_manual_test_cases)),
            )
            .service(
                web::resource("/update-test-case-status/{test_case_id}")
                    .route(web::post().to(update_test_case_status)),
            )
            .service(
                web::resource("/test-cases/{input_source_id}/csv")
                    .route(web::get().to(export_test_cases_csv)),
            )
            .service(
                web::resource("/test-runs/{input_source_id}/csv")
                    .route(web::get().to(export_test_runs_csv)),
            ),
    );
}
