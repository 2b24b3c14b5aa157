//! E2E tests: automation script generation, download and simulated runs.

use actix_web::test;
use uuid::Uuid;

use super::test_helpers::*;

async fn generate_script<S>(app: &S, source_id: &str, query: &str) -> (u16, serde_json::Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::post()
        .uri(&format!("/api/script-output/generate/{}{}", source_id, query))
        .to_request();
    send_json(app, req).await
}

#[actix_rt::test]
async fn test_generate_list_download_script() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let id = create_user_story(&app, "Login story").await;
    generate_cases(&app, &id).await;

    let (status, body) = generate_script(&app, &id, "").await;
    assert_eq!(status, 200, "Generate failed: {:?}", body);
    assert_eq!(body["script_type"], "playwright_python");
    assert_eq!(body["origin"], "sample");
    assert!(body["content"].as_str().unwrap().contains("sync_playwright"));
    let script_id = body["script_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/script-output/scripts/{}", id))
        .to_request();
    let (status, listed) = send_json(&app, req).await;
    assert_eq!(status, 200);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["name"], "Automation Script - Login story");
    assert_eq!(
        listed[0]["download_url"],
        format!("/api/script-output/download/{}", script_id)
    );

    let req = test::TestRequest::get()
        .uri(&format!("/api/script-output/download/{}", script_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));
    let disposition = resp
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains("Automation_Script_-_Login_story.py"));
    let bytes = test::read_body(resp).await;
    assert_eq!(
        String::from_utf8(bytes.to_vec()).unwrap(),
        body["content"].as_str().unwrap()
    );
}

#[actix_rt::test]
async fn test_script_type_selection() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let id = create_user_story(&app, "Login story").await;
    generate_cases(&app, &id).await;

    let (status, body) = generate_script(&app, &id, "?script_type=playwright_selenium").await;
    assert_eq!(status, 200);
    assert_eq!(body["script_type"], "playwright_selenium");
    assert!(body["content"].as_str().unwrap().contains("selenium"));

    // Unknown flavors fall back to Playwright/Python
    let (status, body) = generate_script(&app, &id, "?script_type=cypress").await;
    assert_eq!(status, 200);
    assert_eq!(body["script_type"], "playwright_python");
}

#[actix_rt::test]
async fn test_generate_script_without_cases() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let id = create_user_story(&app, "Login story").await;

    let (status, body) = generate_script(&app, &id, "").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, _) = generate_script(&app, &Uuid::now_v7().to_string(), "").await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_execute_script() {
    let pool = create_test_pool().await;
    let app = create_app_with(&pool, degraded_generator(), test_executor(true)).await;
    let id = create_user_story(&app, "Login story").await;
    generate_cases(&app, &id).await;
    let (_, body) = generate_script(&app, &id, "").await;
    let script_id = body["script_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/script-output/execute/{}", script_id))
        .to_request();
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["script_id"], script_id.as_str());
    let result = &body["execution_result"];
    assert_eq!(result["status"], "completed");
    assert_eq!(
        result["output"],
        "Script executed successfully using playwright_python"
    );
    assert!(result["error"].is_null());
    let time = result["execution_time"].as_f64().unwrap();
    assert!((2.0..5.0).contains(&time));
}

#[actix_rt::test]
async fn test_execute_script_failure() {
    let pool = create_test_pool().await;
    let app = create_app_with(&pool, degraded_generator(), test_executor(false)).await;
    let id = create_user_story(&app, "Login story").await;
    generate_cases(&app, &id).await;
    let (_, body) = generate_script(&app, &id, "").await;
    let script_id = body["script_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/script-output/execute/{}", script_id))
        .to_request();
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["execution_result"]["status"], "failed");
    assert_eq!(
        body["execution_result"]["error"],
        "Simulated script execution error"
    );
}

#[actix_rt::test]
async fn test_delete_script() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let id = create_user_story(&app, "Login story").await;
    generate_cases(&app, &id).await;
    let (_, body) = generate_script(&app, &id, "").await;
    let script_id = body["script_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/script-output/scripts/{}", script_id))
        .to_request();
    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Script deleted successfully");

    let req = test::TestRequest::get()
        .uri(&format!("/api/script-output/download/{}", script_id))
        .to_request();
    assert_eq!(send_json(&app, req).await.0, 404);

    let req = test::TestRequest::post()
        .uri(&format!("/api/script-output/execute/{}", script_id))
        .to_request();
    assert_eq!(send_json(&app, req).await.0, 404);
}
