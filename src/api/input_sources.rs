//! Input source API handlers.

use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, web};
use futures_util::StreamExt;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use super::UploadLimit;
use crate::db::DbPool;
use crate::db::input_sources::NewInputSource;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateUserPromptRequest, InputSourceResponse, MessageResponse, SourceType,
    UpdateInputSourceRequest,
};
use crate::services::swagger::{Endpoint, SwaggerDocument, SwaggerFetcher};

/// Input source created from a Swagger document.
#[derive(Debug, Serialize, ToSchema)]
pub struct SwaggerSourceResponse {
    #[serde(flatten)]
    pub input_source: InputSourceResponse,
    /// Operations found in the document.
    pub endpoints: Vec<Endpoint>,
}

fn require_text(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Read a whole multipart field, failing once it exceeds `limit` bytes.
async fn read_field(field: &mut Field, limit: usize) -> AppResult<Vec<u8>> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
        if data.len() + chunk.len() > limit {
            return Err(AppError::InvalidInput(format!(
                "Upload exceeds the {} byte limit",
                limit
            )));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

async fn read_text_field(field: &mut Field, limit: usize) -> AppResult<String> {
    let data = read_field(field, limit).await?;
    String::from_utf8(data)
        .map_err(|_| AppError::InvalidInput("Form field is not valid UTF-8".to_string()))
}

/// Named fields collected from a multipart form.
#[derive(Default)]
struct SwaggerForm {
    name: Option<String>,
    swagger_url: Option<String>,
    file: Option<(Option<String>, Vec<u8>)>,
}

async fn collect_form(payload: &mut Multipart, limit: usize) -> AppResult<SwaggerForm> {
    let mut form = SwaggerForm::default();

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        let content_disposition = field
            .content_disposition()
            .ok_or_else(|| AppError::InvalidInput("Missing content disposition".to_string()))?;
        let field_name = content_disposition.get_name().map(str::to_string);
        let filename = content_disposition.get_filename().map(str::to_string);

        match field_name.as_deref() {
            Some("file") => {
                let data = read_field(&mut field, limit).await?;
                form.file = Some((filename, data));
            }
            Some("name") => form.name = Some(read_text_field(&mut field, limit).await?),
            Some("swagger_url") => {
                form.swagger_url = Some(read_text_field(&mut field, limit).await?)
            }
            _ => {
                // Unknown fields are drained and ignored
                read_field(&mut field, limit).await?;
            }
        }
    }

    Ok(form)
}

/// List all input sources, newest first.
#[utoipa::path(
    get,
    path = "/api/input-sources/",
    tag = "Input Sources",
    responses(
        (status = 200, description = "All input sources", body = Vec<InputSourceResponse>)
    )
)]
pub async fn list_input_sources(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let sources = pool.list_input_sources().await?;
    let response: Vec<InputSourceResponse> = sources.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(response))
}

#[utoipa::path(
    get,
    path = "/api/input-sources/{id}",
    tag = "Input Sources",
    params(("id" = Uuid, Path, description = "Input source ID")),
    responses(
        (status = 200, description = "Input source", body = InputSourceResponse),
        (status = 404, description = "Input source not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_input_source(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let source = pool.require_input_source(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(InputSourceResponse::from(source)))
}

/// Update name, source type or content.
///
/// Swagger content is validated before it is stored.
#[utoipa::path(
    put,
    path = "/api/input-sources/{id}",
    tag = "Input Sources",
    params(("id" = Uuid, Path, description = "Input source ID")),
    request_body = UpdateInputSourceRequest,
    responses(
        (status = 200, description = "Updated input source", body = InputSourceResponse),
        (status = 400, description = "Invalid update", body = crate::error::ErrorResponse),
        (status = 404, description = "Input source not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_input_source(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateInputSourceRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    if let Some(name) = &req.name {
        require_text(name, "name")?;
    }
    if let Some(content) = &req.content {
        require_text(content, "content")?;
    }

    let existing = pool.require_input_source(id).await?;
    let effective_type = req
        .source_type
        .or_else(|| SourceType::parse(&existing.source_type))
        .unwrap_or(SourceType::PlainText);
    if effective_type == SourceType::Swagger {
        let content = req.content.as_deref().unwrap_or(&existing.content);
        SwaggerDocument::parse(content)?;
    }

    let updated = pool
        .update_input_source(id, req.name, req.source_type, req.content)
        .await?
        .ok_or_else(|| AppError::NotFound("Input source not found".to_string()))?;

    info!(input_source_id = %id, "Input source updated");
    Ok(HttpResponse::Ok().json(InputSourceResponse::from(updated)))
}

/// Delete an input source and everything generated from it.
#[utoipa::path(
    delete,
    path = "/api/input-sources/{id}",
    tag = "Input Sources",
    params(("id" = Uuid, Path, description = "Input source ID")),
    responses(
        (status = 200, description = "Input source deleted", body = MessageResponse),
        (status = 404, description = "Input source not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_input_source(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !pool.delete_input_source(id).await? {
        return Err(AppError::NotFound("Input source not found".to_string()));
    }

    info!(input_source_id = %id, "Input source deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Input source deleted successfully")))
}

/// Create an input source from typed text.
#[utoipa::path(
    post,
    path = "/api/input-sources/user-prompt",
    tag = "Input Sources",
    request_body = CreateUserPromptRequest,
    responses(
        (status = 201, description = "Input source created", body = InputSourceResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_user_prompt(
    pool: web::Data<DbPool>,
    body: web::Json<CreateUserPromptRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    require_text(&req.name, "name")?;
    require_text(&req.content, "content")?;

    if req.source_type == SourceType::Swagger {
        SwaggerDocument::parse(req.content.as_str())?;
    }

    let source = pool
        .insert_input_source(NewInputSource {
            name: req.name.trim().to_string(),
            source_type: req.source_type,
            content: req.content,
            source_url: None,
        })
        .await?;

    info!(
        input_source_id = %source.id,
        source_type = %req.source_type,
        "Input source created from prompt"
    );
    Ok(HttpResponse::Created().json(InputSourceResponse::from(source)))
}

/// Create an input source from an uploaded Swagger/OpenAPI JSON file.
///
/// Form fields: `file` (required), `name` (defaults to the file name).
#[utoipa::path(
    post,
    path = "/api/input-sources/swagger",
    tag = "Input Sources",
    request_body(content = String, content_type = "multipart/form-data", description = "Fields `file` and `name`"),
    responses(
        (status = 201, description = "Input source created", body = SwaggerSourceResponse),
        (status = 400, description = "Missing file or invalid document", body = crate::error::ErrorResponse)
    )
)]
pub async fn upload_swagger(
    pool: web::Data<DbPool>,
    limit: web::Data<UploadLimit>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = collect_form(&mut payload, limit.0).await?;

    let (filename, data) = form
        .file
        .ok_or_else(|| AppError::InvalidInput("Missing 'file' field".to_string()))?;
    let raw = String::from_utf8(data)
        .map_err(|_| AppError::InvalidInput("Swagger file is not valid UTF-8".to_string()))?;
    let document = SwaggerDocument::parse(raw)?;

    let name = form
        .name
        .filter(|n| !n.trim().is_empty())
        .or(filename)
        .ok_or_else(|| AppError::InvalidInput("name must not be empty".to_string()))?;

    let endpoints = document.endpoints();
    let source = pool
        .insert_input_source(NewInputSource {
            name: name.trim().to_string(),
            source_type: SourceType::Swagger,
            content: document.raw,
            source_url: None,
        })
        .await?;

    info!(
        input_source_id = %source.id,
        endpoints = endpoints.len(),
        "Input source created from Swagger upload"
    );
    Ok(HttpResponse::Created().json(SwaggerSourceResponse {
        input_source: source.into(),
        endpoints,
    }))
}

/// Create an input source by fetching a Swagger/OpenAPI document.
///
/// Form fields: `name`, `swagger_url`.
#[utoipa::path(
    post,
    path = "/api/input-sources/swagger-url",
    tag = "Input Sources",
    request_body(content = String, content_type = "multipart/form-data", description = "Fields `name` and `swagger_url`"),
    responses(
        (status = 201, description = "Input source created", body = SwaggerSourceResponse),
        (status = 400, description = "Invalid document", body = crate::error::ErrorResponse),
        (status = 502, description = "Document could not be fetched", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_from_swagger_url(
    pool: web::Data<DbPool>,
    fetcher: web::Data<SwaggerFetcher>,
    limit: web::Data<UploadLimit>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = collect_form(&mut payload, limit.0).await?;

    let name = form.name.unwrap_or_default();
    require_text(&name, "name")?;
    let url = form
        .swagger_url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("swagger_url must not be empty".to_string()))?;

    let document = fetcher.fetch(&url, limit.0).await?;
    let endpoints = document.endpoints();

    let source = pool
        .insert_input_source(NewInputSource {
            name: name.trim().to_string(),
            source_type: SourceType::Swagger,
            content: document.raw,
            source_url: Some(url.trim().to_string()),
        })
        .await?;

    info!(
        input_source_id = %source.id,
        endpoints = endpoints.len(),
        "Input source created from Swagger URL"
    );
    Ok(HttpResponse::Created().json(SwaggerSourceResponse {
        input_source: source.into(),
        endpoints,
    }))
}

/// Configure input source routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(["/input-sources", "/input-sources/"])
            .route(web::get().to(list_input_sources)),
    )
    .service(web::resource("/input-sources/user-prompt").route(web::post().to(create_user_prompt)))
    .service(web::resource("/input-sources/swagger").route(web::post().to(upload_swagger)))
    .service(
        web::resource("/input-sources/swagger-url").route(web::post().to(create_from_swagger_url)),
    )
    .service(
        web::resource("/input-sources/{id}")
            .route(web::get().to(get_input_source))
            .route(web::put().to(update_input_source))
            .route(web::delete().to(delete_input_source)),
    );
}
