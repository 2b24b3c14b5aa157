//! E2E tests: test case generation, authoring and simulated execution.

use std::time::Duration;

use actix_web::test;
use serde_json::json;
use testgen_lib::config::ExecutionSettings;
use testgen_lib::services::TestExecutor;
use uuid::Uuid;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::test_helpers::*;

#[actix_rt::test]
async fn test_degraded_generation_returns_samples() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let id = create_user_story(&app, "Login story").await;

    let body = generate_cases(&app, &id).await;

    assert_eq!(body["origin"], "sample");
    assert_eq!(body["message"], "Generated 2 test cases");
    let cases = body["test_cases"].as_array().unwrap();
    assert_eq!(cases.len(), 2);
    assert_eq!(cases[0]["title"], "Sample Test Case for user story");
    assert_eq!(cases[1]["title"], "Edge Case Test for user story");
    assert_eq!(cases[0]["status"], "pending");
    assert_eq!(cases[0]["steps"].as_array().unwrap().len(), 4);

    let req = test::TestRequest::get()
        .uri(&format!("/api/test-generation/test-cases/{}", id))
        .to_request();
    let (status, listed) = send_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(listed.as_array().unwrap().len(), 2);
    assert_eq!(listed[0]["title"], "Sample Test Case for user story");
}

#[actix_rt::test]
async fn test_generation_appends_to_existing_cases() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let id = create_user_story(&app, "Login story").await;

    generate_cases(&app, &id).await;
    generate_cases(&app, &id).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/test-generation/test-cases/{}", id))
        .to_request();
    let (_, listed) = send_json(&app, req).await;
    assert_eq!(listed.as_array().unwrap().len(), 4);
}

#[actix_rt::test]
async fn test_live_generation_parses_model_output() {
    let server = MockServer::start().await;
    let content = r#"Here are your test cases:
[
  {"title": "Valid login", "description": "Happy path", "steps": ["Open login", "Submit valid credentials"], "expected_result": "Dashboard shown"},
  {"title": "Wrong password", "description": "Rejects bad password", "steps": "Open login\nSubmit wrong password", "expected_result": "Error shown"},
  {"title": "Locked account", "description": "", "steps": [], "expected_result": "Lockout message"}
]
Let me know if you need more."#;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test-key"))
        .and(body_string_contains("user story"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(content)))
        .expect(1)
        .mount(&server)
        .await;

    let pool = create_test_pool().await;
    let generator = live_generator(&format!("{}/chat/completions", server.uri()));
    let app = create_app_with(&pool, generator, test_executor(true)).await;
    let id = create_user_story(&app, "Login story").await;

    let body = generate_cases(&app, &id).await;
    assert_eq!(body["origin"], "generated");
    let cases = body["test_cases"].as_array().unwrap();
    assert_eq!(cases.len(), 3);
    assert_eq!(cases[0]["title"], "Valid login");
    assert_eq!(cases[1]["steps"], json!(["Open login", "Submit wrong password"]));
}

#[actix_rt::test]
async fn test_live_generation_unparseable_output_yields_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("I cannot help with that request.")),
        )
        .mount(&server)
        .await;

    let pool = create_test_pool().await;
    let generator = live_generator(&format!("{}/chat/completions", server.uri()));
    let app = create_app_with(&pool, generator, test_executor(true)).await;
    let id = create_user_story(&app, "Login story").await;

    let body = generate_cases(&app, &id).await;
    assert_eq!(body["origin"], "placeholder");
    assert_eq!(body["test_cases"].as_array().unwrap().len(), 1);
}

#[actix_rt::test]
async fn test_live_generation_provider_failure_stores_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let pool = create_test_pool().await;
    let generator = live_generator(&format!("{}/chat/completions", server.uri()));
    let app = create_app_with(&pool, generator, test_executor(true)).await;
    let id = create_user_story(&app, "Login story").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/test-generation/generate/{}", id))
        .to_request();
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, 502);
    assert_eq!(body["error"], "UPSTREAM_ERROR");

    let stored = pool
        .list_test_cases_for_source(Uuid::parse_str(&id).unwrap())
        .await
        .unwrap();
    assert!(stored.is_empty());
}

#[actix_rt::test]
async fn test_generate_for_missing_source() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/test-generation/generate/{}", Uuid::now_v7()))
        .to_request();
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "Input source not found");
}

#[actix_rt::test]
async fn test_execute_records_completed_run() {
    let pool = create_test_pool().await;
    let app = create_app_with(&pool, degraded_generator(), test_executor(true)).await;
    let id = create_user_story(&app, "Login story").await;
    generate_cases(&app, &id).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/test-generation/execute/{}", id))
        .to_request();
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, 200, "Execute failed: {:?}", body);

    let results = &body["execution_results"];
    assert_eq!(results["total_tests"], 2);
    assert_eq!(results["passed_tests"], 2);
    assert_eq!(results["failed_tests"], 0);
    assert_eq!(body["summary"]["success_rate"], 100.0);
    assert_eq!(results["test_results"][0]["position"], 1);
    assert!(results["test_results"][0]["error_message"].is_null());

    let req = test::TestRequest::get()
        .uri(&format!("/api/test-generation/test-runs/{}", id))
        .to_request();
    let (status, runs) = send_json(&app, req).await;
    assert_eq!(status, 200);
    let runs = runs.as_array().unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0]["id"], body["test_run_id"]);
    assert_eq!(runs[0]["status"], "completed");
    assert_eq!(runs[0]["name"], format!("Test Run for Input Source {}", id));
    assert!(runs[0]["completed_at"].is_string());
    assert!(runs[0]["results_summary"].as_str().unwrap().contains("Total Tests: 2"));
}

#[actix_rt::test]
async fn test_execute_failing_cases() {
    let pool = create_test_pool().await;
    let app = create_app_with(&pool, degraded_generator(), test_executor(false)).await;
    let id = create_user_story(&app, "Login story").await;
    generate_cases(&app, &id).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/test-generation/execute/{}", id))
        .to_request();
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, 200);

    let results = &body["execution_results"];
    assert_eq!(results["failed_tests"], 2);
    assert_eq!(
        results["test_results"][1]["error_message"],
        "Simulated test failure"
    );
    assert_eq!(body["summary"]["success_rate"], 0.0);
}

#[actix_rt::test]
async fn test_stored_runs_balance_counts() {
    let pool = create_test_pool().await;
    let executor = TestExecutor::new(ExecutionSettings {
        simulate_delays: false,
        case_pass_rate: 0.5,
        script_success_rate: 0.5,
    });
    let app = create_app_with(&pool, degraded_generator(), executor).await;
    let id = create_user_story(&app, "Login story").await;
    generate_cases(&app, &id).await;
    generate_cases(&app, &id).await;

    for _ in 0..5 {
        let req = test::TestRequest::post()
            .uri(&format!("/api/test-generation/execute/{}", id))
            .to_request();
        assert_eq!(send_json(&app, req).await.0, 200);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/test-generation/test-runs/{}", id))
        .to_request();
    let (_, runs) = send_json(&app, req).await;
    let runs = runs.as_array().unwrap();
    assert_eq!(runs.len(), 5);
    for run in runs {
        let total = run["total_tests"].as_i64().unwrap();
        let passed = run["passed_tests"].as_i64().unwrap();
        let failed = run["failed_tests"].as_i64().unwrap();
        assert_eq!(total, 4);
        assert_eq!(total, passed + failed, "Unbalanced run: {:?}", run);
        assert_eq!(run["status"], "completed");
    }
}

#[actix_rt::test]
async fn test_interrupted_execution_stores_no_run() {
    let pool = create_test_pool().await;
    let executor = TestExecutor::new(ExecutionSettings {
        simulate_delays: true,
        case_pass_rate: 1.0,
        script_success_rate: 1.0,
    });
    let app = create_app_with(&pool, degraded_generator(), executor).await;
    let id = create_user_story(&app, "Login story").await;
    generate_cases(&app, &id).await;

    // Each simulated case sleeps at least 100ms, so the request is dropped mid-run
    let req = test::TestRequest::post()
        .uri(&format!("/api/test-generation/execute/{}", id))
        .to_request();
    let interrupted =
        tokio::time::timeout(Duration::from_millis(50), test::call_service(&app, req)).await;
    assert!(interrupted.is_err());

    let req = test::TestRequest::get()
        .uri(&format!("/api/test-generation/test-runs/{}", id))
        .to_request();
    let (status, runs) = send_json(&app, req).await;
    assert_eq!(status, 200);
    assert!(runs.as_array().unwrap().is_empty(), "Partial run stored: {:?}", runs);
}

#[actix_rt::test]
async fn test_execute_without_cases_is_not_found() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let id = create_user_story(&app, "Login story").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/test-generation/execute/{}", id))
        .to_request();
    let (status, _) = send_json(&app, req).await;
    assert_eq!(status, 404);

    let runs = pool
        .list_test_runs_for_source(Uuid::parse_str(&id).unwrap())
        .await
        .unwrap();
    assert!(runs.is_empty());
}

#[actix_rt::test]
async fn test_manual_test_case_crud() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let id = create_user_story(&app, "Login story").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/test-generation/test-cases/{}", id))
        .set_json(json!({
            "title": "Remember me",
            "description": "Session persists",
            "steps": "Tick remember me\nLog in\nRestart browser",
            "expected_result": "Still logged in",
        }))
        .to_request();
    let (status, created) = send_json(&app, req).await;
    assert_eq!(status, 201, "Create failed: {:?}", created);
    assert_eq!(created["steps"].as_array().unwrap().len(), 3);
    assert_eq!(created["is_automated"], false);
    let case_id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/test-generation/test-cases/{}", case_id))
        .set_json(json!({"title": "Remember me checkbox", "status": "passed", "is_automated": true}))
        .to_request();
    let (status, updated) = send_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(updated["title"], "Remember me checkbox");
    assert_eq!(updated["status"], "passed");
    assert_eq!(updated["is_automated"], true);
    assert_eq!(updated["description"], "Session persists");

    let req = test::TestRequest::put()
        .uri(&format!("/api/test-generation/test-cases/{}", case_id))
        .set_json(json!({"title": "  "}))
        .to_request();
    assert_eq!(send_json(&app, req).await.0, 400);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/test-generation/test-cases/{}", case_id))
        .to_request();
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Test case deleted successfully");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/test-generation/test-cases/{}", case_id))
        .to_request();
    assert_eq!(send_json(&app, req).await.0, 404);
}

#[actix_rt::test]
async fn test_multiline_step_items_are_split_consistently() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let id = create_user_story(&app, "Login story").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/test-generation/test-cases/{}", id))
        .set_json(json!({
            "title": "Two-step item",
            "steps": ["Open login\nEnter email", "Submit"],
        }))
        .to_request();
    let (status, created) = send_json(&app, req).await;
    assert_eq!(status, 201);
    let expected = json!(["Open login", "Enter email", "Submit"]);
    assert_eq!(created["steps"], expected);

    let req = test::TestRequest::get()
        .uri(&format!("/api/test-generation/test-cases/{}", id))
        .to_request();
    let (_, listed) = send_json(&app, req).await;
    assert_eq!(listed[0]["steps"], expected);
}

#[actix_rt::test]
async fn test_create_test_case_rejects_blank_title() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let id = create_user_story(&app, "Login story").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/test-generation/test-cases/{}", id))
        .set_json(json!({"title": ""}))
        .to_request();
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");
}

#[actix_rt::test]
async fn test_delete_test_run() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let id = create_user_story(&app, "Login story").await;
    generate_cases(&app, &id).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/test-generation/execute/{}", id))
        .to_request();
    let (_, body) = send_json(&app, req).await;
    let run_id = body["test_run_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/test-generation/test-runs/{}", run_id))
        .to_request();
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Test run deleted successfully");

    let req = test::TestRequest::get()
        .uri(&format!("/api/test-generation/test-runs/{}", id))
        .to_request();
    let (_, runs) = send_json(&app, req).await;
    assert!(runs.as_array().unwrap().is_empty());
}
