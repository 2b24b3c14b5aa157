//! Automation script handlers.

use actix_web::http::header::ContentDisposition;
use actix_web::{HttpResponse, web};
use tracing::info;
use uuid::Uuid;

use super::test_generation::NO_TEST_CASES;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    ExecuteScriptResponse, GenerateScriptQuery, GenerateScriptResponse, GeneratedTestCase,
    MessageResponse, ScriptSummary, ScriptType,
};
use crate::services::export::script_filename;
use crate::services::{TestExecutor, TestGenerator};

/// Generate an automation script from an input source's test cases.
///
/// Unknown `script_type` values fall back to `playwright_python`.
#[utoipa::path(
    post,
    path = "/api/script-output/generate/{input_source_id}",
    tag = "Script Output",
    params(
        ("input_source_id" = Uuid, Path, description = "Input source ID"),
        ("script_type" = Option<String>, Query, description = "playwright_python (default) or playwright_selenium")
    ),
    responses(
        (status = 200, description = "Script generated", body = GenerateScriptResponse),
        (status = 404, description = "Input source or test cases not found", body = crate::error::ErrorResponse),
        (status = 502, description = "Completion provider failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn generate_script(
    pool: web::Data<DbPool>,
    generator: web::Data<TestGenerator>,
    path: web::Path<Uuid>,
    query: web::Query<GenerateScriptQuery>,
) -> AppResult<HttpResponse> {
    let input_source_id = path.into_inner();
    let script_type = ScriptType::parse_or_default(query.script_type.as_deref().unwrap_or_default());

    let source = pool.require_input_source(input_source_id).await?;
    let cases = pool.list_test_cases_for_source(input_source_id).await?;
    if cases.is_empty() {
        return Err(AppError::NotFound(NO_TEST_CASES.to_string()));
    }

    let records: Vec<GeneratedTestCase> = cases.iter().map(GeneratedTestCase::from_stored).collect();
    let (origin, content) = generator
        .generate_script(&records, script_type)
        .await
        .into_script()?;

    let script = pool
        .insert_script(
            input_source_id,
            format!("Automation Script - {}", source.name),
            script_type,
            content,
        )
        .await?;

    info!(
        input_source_id = %input_source_id,
        script_id = %script.id,
        script_type = %script_type,
        origin = ?origin,
        "Stored generated script"
    );

    Ok(HttpResponse::Ok().json(GenerateScriptResponse {
        message: "Automation script generated successfully".to_string(),
        script_id: script.id,
        script_type,
        origin,
        content: script.content,
    }))
}

/// Simulate running a stored script.
#[utoipa::path(
    post,
    path = "/api/script-output/execute/{script_id}",
    tag = "Script Output",
    params(("script_id" = Uuid, Path, description = "Script ID")),
    responses(
        (status = 200, description = "Execution finished", body = ExecuteScriptResponse),
        (status = 404, description = "Script not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn execute_script(
    pool: web::Data<DbPool>,
    executor: web::Data<TestExecutor>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let script_id = path.into_inner();
    let script = pool
        .get_script(script_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Script not found".to_string()))?;

    let execution_result = executor
        .run_script(ScriptType::parse_or_default(&script.script_type), &script.content)
        .await;

    Ok(HttpResponse::Ok().json(ExecuteScriptResponse {
        script_id,
        execution_result,
    }))
}

#[utoipa::path(
    get,
    path = "/api/script-output/scripts/{input_source_id}",
    tag = "Script Output",
    params(("input_source_id" = Uuid, Path, description = "Input source ID")),
    responses(
        (status = 200, description = "Scripts, newest first", body = Vec<ScriptSummary>),
        (status = 404, description = "Input source not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_scripts(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let input_source_id = path.into_inner();
    pool.require_input_source(input_source_id).await?;

    let scripts = pool.list_scripts_for_source(input_source_id).await?;
    let response: Vec<ScriptSummary> = scripts.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// Download a script as a plain-text attachment.
#[utoipa::path(
    get,
    path = "/api/script-output/download/{script_id}",
    tag = "Script Output",
    params(("script_id" = Uuid, Path, description = "Script ID")),
    responses(
        (status = 200, description = "Script file", content_type = "text/plain", body = String),
        (status = 404, description = "Script not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn download_script(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let script = pool
        .get_script(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Script not found".to_string()))?;

    let script_type = ScriptType::parse_or_default(&script.script_type);
    let filename = script_filename(&script.name, script_type.file_extension());

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header(ContentDisposition::attachment(filename))
        .body(script.content))
}

#[utoipa::path(
    delete,
    path = "/api/script-output/scripts/{script_id}",
    tag = "Script Output",
    params(("script_id" = Uuid, Path, description = "Script ID")),
    responses(
        (status = 200, description = "Script deleted", body = MessageResponse),
        (status = 404, description = "Script not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_script(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    if !pool.delete_script(path.into_inner()).await? {
        return Err(AppError::NotFound("Script not found".to_string()));
    }
    Ok(HttpResponse::Ok().json(MessageResponse::new("Script deleted successfully")))
}

/// Configure script output routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/script-output")
            .service(
                web::resource("/generate/{input_source_id}").route(web::post().to(generate_script)),
            )
            .service(web::resource("/execute/{script_id}").route(web::post().to(execute_script)))
            // GET takes an input source ID, DELETE a script ID
            .service(
                web::resource("/scripts/{id}")
                    .route(web::get().to(list_scripts))
                    .route(web::delete().to(delete_script)),
            )
            .service(web::resource("/download/{script_id}").route(web::get().to(download_script))),
    );
}
