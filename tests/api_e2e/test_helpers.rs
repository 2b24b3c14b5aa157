//! Shared test helpers for API E2E tests.

use actix_web::{App, dev::ServiceResponse, test};
use secrecy::SecretString;
use serde_json::{Value, json};
use testgen_lib::api::AppServices;
use testgen_lib::config::{AiSettings, ExecutionSettings};
use testgen_lib::db::DbPool;
use testgen_lib::services::{SwaggerFetcher, TestExecutor, TestGenerator};

pub const MULTIPART_BOUNDARY: &str = "----testgen-e2e-boundary";

pub const PETSTORE_SWAGGER: &str = r#"{
  "swagger": "2.0",
  "info": {"title": "Petstore", "version": "1.0"},
  "paths": {
    "/pets": {
      "get": {"summary": "List pets", "description": "Returns all pets"},
      "post": {"summary": "Create pet"},
      "parameters": []
    },
    "/pets/{id}": {
      "delete": {"summary": "Delete pet"}
    }
  }
}"#;

/// Fresh in-memory database with the schema applied.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn create_test_pool() -> DbPool {
    let pool = DbPool::connect("sqlite::memory:", 1, 1)
        .await
        .expect("Failed to open in-memory database");
    pool.run_migrations()
        .await
        .expect("Failed to run migrations");
    pool
}

/// Executor without sleeps and with fixed outcomes.
pub fn test_executor(pass: bool) -> TestExecutor {
    let rate = if pass { 1.0 } else { 0.0 };
    TestExecutor::new(ExecutionSettings {
        simulate_delays: false,
        case_pass_rate: rate,
        script_success_rate: rate,
    })
}

/// Generator with no API key configured.
pub fn degraded_generator() -> TestGenerator {
    TestGenerator::from_settings(&AiSettings::default()).expect("Failed to build generator")
}

/// Generator pointed at a mock chat-completion endpoint.
pub fn live_generator(completions_url: &str) -> TestGenerator {
    let settings = AiSettings {
        api_key: Some(SecretString::from("sk-test-key")),
        base_url: completions_url.to_string(),
        ..AiSettings::default()
    };
    TestGenerator::from_settings(&settings).expect("Failed to build generator")
}

pub async fn create_test_app(
    pool: &DbPool,
) -> impl actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
    create_app_with(pool, degraded_generator(), test_executor(true)).await
}

pub async fn create_app_with(
    pool: &DbPool,
    generator: TestGenerator,
    executor: TestExecutor,
) -> impl actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
    let fetcher = SwaggerFetcher::new().expect("Failed to build fetcher");
    let services = AppServices::new(pool.clone(), generator, executor, fetcher, 64 * 1024);

    test::init_service(App::new().configure(|cfg| services.configure(cfg))).await
}

/// Build a multipart body from `(name, filename, content)` parts.
pub fn multipart_body(parts: &[(&str, Option<&str>, &str)]) -> Vec<u8> {
    let mut body = String::new();
    for (name, filename, content) in parts {
        body.push_str(&format!("--{}\r\n", MULTIPART_BOUNDARY));
        match filename {
            Some(f) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/json\r\n\r\n",
                name, f
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                name
            )),
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", MULTIPART_BOUNDARY));
    body.into_bytes()
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY)
}

/// Send a request and return status plus JSON body (`Null` when the body is empty).
pub async fn send_json<S>(app: &S, req: actix_http::Request) -> (u16, Value)
where
    S: actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let bytes = test::read_body(resp).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

/// Create a text input source and return its ID.
pub async fn create_user_story<S>(app: &S, name: &str) -> String
where
    S: actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/input-sources/user-prompt")
        .set_json(json!({
            "name": name,
            "source_type": "user_story",
            "content": "As a user I want to log in so that I can see my dashboard",
        }))
        .to_request();
    let (status, body) = send_json(app, req).await;
    assert_eq!(status, 201, "Failed to create input source: {:?}", body);
    body["id"].as_str().unwrap().to_string()
}

/// Generate test cases for a source and return the response body.
pub async fn generate_cases<S>(app: &S, source_id: &str) -> Value
where
    S: actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri(&format!("/api/test-generation/generate/{}", source_id))
        .to_request();
    let (status, body) = send_json(app, req).await;
    assert_eq!(status, 200, "Generation failed: {:?}", body);
    body
}

/// Completion response carrying `content` as the assistant message.
pub fn completion_body(content: &str) -> Value {
    json!({
        "id": "gen-1",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}}
        ]
    })
}
