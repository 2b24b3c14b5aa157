//! E2E tests: input source management.

use actix_web::test;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::test_helpers::*;

#[actix_rt::test]
async fn test_create_get_list_input_sources() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let first = create_user_story(&app, "Login story").await;
    let second = create_user_story(&app, "Checkout story").await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/input-sources/{}", first))
        .to_request();
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["name"], "Login story");
    assert_eq!(body["source_type"], "user_story");

    // Both the bare and trailing-slash collection paths resolve
    for uri in ["/api/input-sources", "/api/input-sources/"] {
        let (status, body) = send_json(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(status, 200);
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 2);
        // Newest first
        assert_eq!(list[0]["id"], second.as_str());
        assert_eq!(list[1]["id"], first.as_str());
    }
}

#[actix_rt::test]
async fn test_user_prompt_defaults_to_plain_text() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::post()
        .uri("/api/input-sources/user-prompt")
        .set_json(json!({"name": "Notes", "content": "Check the search page"}))
        .to_request();
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, 201);
    assert_eq!(body["source_type"], "plain_text");
}

#[actix_rt::test]
async fn test_user_prompt_rejects_blank_content() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::post()
        .uri("/api/input-sources/user-prompt")
        .set_json(json!({"name": "Empty", "content": "   "}))
        .to_request();
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");
}

#[actix_rt::test]
async fn test_update_input_source() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let id = create_user_story(&app, "Login story").await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/input-sources/{}", id))
        .set_json(json!({"name": "Login story v2"}))
        .to_request();
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["name"], "Login story v2");
    assert_eq!(body["source_type"], "user_story");

    // Switching to swagger requires valid Swagger content
    let req = test::TestRequest::put()
        .uri(&format!("/api/input-sources/{}", id))
        .set_json(json!({"source_type": "swagger"}))
        .to_request();
    let (status, _) = send_json(&app, req).await;
    assert_eq!(status, 400);

    let req = test::TestRequest::put()
        .uri(&format!("/api/input-sources/{}", Uuid::now_v7()))
        .set_json(json!({"name": "Ghost"}))
        .to_request();
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "Input source not found");
}

#[actix_rt::test]
async fn test_get_missing_input_source() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/input-sources/{}", Uuid::now_v7()))
        .to_request();
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[actix_rt::test]
async fn test_upload_swagger_file() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let body = multipart_body(&[
        ("name", None, "Petstore API"),
        ("file", Some("petstore.json"), PETSTORE_SWAGGER),
    ]);
    let req = test::TestRequest::post()
        .uri("/api/input-sources/swagger")
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(body)
        .to_request();
    let (status, body) = send_json(&app, req).await;

    assert_eq!(status, 201, "Upload failed: {:?}", body);
    assert_eq!(body["name"], "Petstore API");
    assert_eq!(body["source_type"], "swagger");
    assert_eq!(body["endpoints"].as_array().unwrap().len(), 3);
    assert_eq!(body["content"], PETSTORE_SWAGGER);
}

#[actix_rt::test]
async fn test_upload_swagger_rejects_invalid_documents() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    for content in ["{not json", r#"{"title": "just an object"}"#] {
        let body = multipart_body(&[
            ("name", None, "Broken"),
            ("file", Some("broken.json"), content),
        ]);
        let req = test::TestRequest::post()
            .uri("/api/input-sources/swagger")
            .insert_header(("content-type", multipart_content_type()))
            .set_payload(body)
            .to_request();
        let (status, body) = send_json(&app, req).await;
        assert_eq!(status, 400, "Expected rejection: {:?}", body);
    }

    let req = test::TestRequest::get().uri("/api/input-sources").to_request();
    let (status, listed) = send_json(&app, req).await;
    assert_eq!(status, 200);
    assert!(listed.as_array().unwrap().is_empty());
}

#[actix_rt::test]
async fn test_upload_swagger_requires_file() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let body = multipart_body(&[("name", None, "No file")]);
    let req = test::TestRequest::post()
        .uri("/api/input-sources/swagger")
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(body)
        .to_request();
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, 400);
    assert!(body["message"].as_str().unwrap().contains("file"));
}

#[actix_rt::test]
async fn test_create_from_swagger_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/swagger.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PETSTORE_SWAGGER))
        .mount(&server)
        .await;

    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let url = format!("{}/v2/swagger.json", server.uri());
    let body = multipart_body(&[
        ("name", None, "Remote petstore"),
        ("swagger_url", None, url.as_str()),
    ]);
    let req = test::TestRequest::post()
        .uri("/api/input-sources/swagger-url")
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(body)
        .to_request();
    let (status, body) = send_json(&app, req).await;

    assert_eq!(status, 201, "Create failed: {:?}", body);
    assert_eq!(body["source_url"], url.as_str());
    assert_eq!(body["endpoints"].as_array().unwrap().len(), 3);
}

#[actix_rt::test]
async fn test_create_from_unreachable_swagger_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let url = format!("{}/missing.json", server.uri());
    let body = multipart_body(&[
        ("name", None, "Missing"),
        ("swagger_url", None, url.as_str()),
    ]);
    let req = test::TestRequest::post()
        .uri("/api/input-sources/swagger-url")
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(body)
        .to_request();
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, 502);
    assert_eq!(body["error"], "UPSTREAM_ERROR");
}

#[actix_rt::test]
async fn test_create_from_oversized_swagger_url() {
    let server = MockServer::start().await;
    let oversized = json!({
        "swagger": "2.0",
        "info": {"title": "Huge", "description": "x".repeat(128 * 1024)},
        "paths": {}
    });
    Mock::given(method("GET"))
        .and(path("/huge.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&oversized))
        .mount(&server)
        .await;

    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let url = format!("{}/huge.json", server.uri());
    let body = multipart_body(&[("name", None, "Huge"), ("swagger_url", None, url.as_str())]);
    let req = test::TestRequest::post()
        .uri("/api/input-sources/swagger-url")
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(body)
        .to_request();
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, 400, "Expected rejection: {:?}", body);
    assert_eq!(body["error"], "INVALID_INPUT");

    let req = test::TestRequest::get().uri("/api/input-sources").to_request();
    let (_, listed) = send_json(&app, req).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[actix_rt::test]
async fn test_delete_input_source_cascades() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let id = create_user_story(&app, "Login story").await;

    let generated = generate_cases(&app, &id).await;
    let case_id = generated["test_cases"][0]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/test-generation/execute/{}", id))
        .to_request();
    assert_eq!(send_json(&app, req).await.0, 200);

    let req = test::TestRequest::post()
        .uri(&format!("/api/script-output/generate/{}", id))
        .to_request();
    let (_, script) = send_json(&app, req).await;
    let script_id = script["script_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/input-sources/{}", id))
        .to_request();
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Input source deleted successfully");

    let source_id = Uuid::parse_str(&id).unwrap();
    assert!(pool.list_test_cases_for_source(source_id).await.unwrap().is_empty());
    assert!(pool.list_test_runs_for_source(source_id).await.unwrap().is_empty());
    assert!(pool.list_scripts_for_source(source_id).await.unwrap().is_empty());
    assert!(pool.get_test_case(Uuid::parse_str(&case_id).unwrap()).await.unwrap().is_none());
    assert!(pool.get_script(Uuid::parse_str(&script_id).unwrap()).await.unwrap().is_none());

    let req = test::TestRequest::delete()
        .uri(&format!("/api/input-sources/{}", id))
        .to_request();
    assert_eq!(send_json(&app, req).await.0, 404);
}
