//! Administrative route tests.
//!
//! Exercises every route mounted by `permission::configure`.


use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{json, Value};

use actix_permission_core::http::security::expression::EngineConfig;
use actix_permission_core::http::security::permission::PermissionExpression;

use common::{create_test_app, create_test_app_with, test_service, test_service_with_config};

// =============================================================================
// Listing and Lookup
// =============================================================================

#[actix_web::test]
async fn test_list_returns_enabled_only() {
    let app = create_test_app().await;

    let req = test::TestRequest::get()
        .uri("/permission-expressions")
        .to_request();
    let records: Vec<PermissionExpression> = test::call_and_read_body_json(&app, req).await;

    let codes: Vec<&str> = records.iter().map(|r| r.permission_code.as_str()).collect();
    assert_eq!(codes, vec!["document:read", "user:edit"]);
}

#[actix_web::test]
async fn test_get_by_code() {
    let app = create_test_app().await;

    let req = test::TestRequest::get()
        .uri("/permission-expressions/code/user:edit")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["id"], 2);
    assert_eq!(body["permissionCode"], "user:edit");
    assert_eq!(
        body["expression"],
        "hasRole('admin') || hasPermission('user:edit')"
    );
    assert_eq!(body["enabled"], true);
}

#[actix_web::test]
async fn test_get_by_unknown_code_is_not_found() {
    let app = create_test_app().await;

    let req = test::TestRequest::get()
        .uri("/permission-expressions/code/nope")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Not Found");
}

// =============================================================================
// Create / Update / Delete
// =============================================================================

#[actix_web::test]
async fn test_create_valid_expression() {
    let app = create_test_app().await;

    let req = test::TestRequest::post()
        .uri("/permission-expressions")
        .set_json(json!({
            "permissionCode": "order:approve",
            "name": "Approve orders",
            "expression": "hasAnyRole('manager', 'admin')"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], 4);
    assert_eq!(body["enabled"], true);

    let req = test::TestRequest::get()
        .uri("/permission-expressions/code/order:approve")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_create_invalid_expression_is_bad_request_and_not_stored() {
    let app = create_test_app().await;

    let req = test::TestRequest::post()
        .uri("/permission-expressions")
        .set_json(json!({
            "permissionCode": "order:approve",
            "expression": "hasRole('admin'"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Bad Request");
    assert!(body["message"]
        .as_str()
        .unwrap_or_default()
        .contains("hasRole('admin'"));

    let req = test::TestRequest::get()
        .uri("/permission-expressions/code/order:approve")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_create_duplicate_code_is_conflict() {
    let app = create_test_app().await;

    let req = test::TestRequest::post()
        .uri("/permission-expressions")
        .set_json(json!({
            "permissionCode": "user:edit",
            "expression": "true"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_create_unknown_function_with_strict_validation() {
    let app =
        create_test_app_with(test_service_with_config(EngineConfig::new().strict_validation(true)))
            .await;

    let req = test::TestRequest::post()
        .uri("/permission-expressions")
        .set_json(json!({
            "permissionCode": "order:approve",
            "expression": "hasRol('admin')"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_update_replaces_expression() {
    let app = create_test_app().await;

    let req = test::TestRequest::put()
        .uri("/permission-expressions/2")
        .set_json(json!({
            "permissionCode": "user:edit",
            "name": "Edit users",
            "expression": "hasRole('admin')",
            "enabled": false
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["id"], 2);
    assert_eq!(body["expression"], "hasRole('admin')");
    assert_eq!(body["enabled"], false);

    let req = test::TestRequest::get()
        .uri("/permission-expressions")
        .to_request();
    let records: Vec<PermissionExpression> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(records.len(), 1);
}

#[actix_web::test]
async fn test_update_invalid_expression_is_bad_request() {
    let app = create_test_app().await;

    let req = test::TestRequest::put()
        .uri("/permission-expressions/2")
        .set_json(json!({
            "permissionCode": "user:edit",
            "expression": "hasRole('admin') &&"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_update_missing_is_not_found() {
    let app = create_test_app().await;

    let req = test::TestRequest::put()
        .uri("/permission-expressions/99")
        .set_json(json!({
            "permissionCode": "x",
            "expression": "true"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_delete_evicts_compiled_expression() {
    let service = test_service();
    let app = create_test_app_with(service.clone()).await;

    let req = test::TestRequest::get()
        .uri("/documents/5")
        .insert_header(("X-Roles", "admin"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(service
        .engine()
        .cache()
        .contains(common::DOCUMENT_READ_EXPRESSION));

    let req = test::TestRequest::delete()
        .uri("/permission-expressions/1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(!service
        .engine()
        .cache()
        .contains(common::DOCUMENT_READ_EXPRESSION));

    let req = test::TestRequest::delete()
        .uri("/permission-expressions/1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Validate / Test / Clear Cache
// =============================================================================

#[actix_web::test]
async fn test_validate_endpoint() {
    let app = create_test_app().await;

    let req = test::TestRequest::post()
        .uri("/permission-expressions/validate")
        .set_json(json!({ "expression": "hasRole('admin') || hasPermission('x')" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["expression"], "hasRole('admin') || hasPermission('x')");

    let req = test::TestRequest::post()
        .uri("/permission-expressions/validate")
        .set_json(json!({ "expression": "hasRole('admin' ||" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["valid"], false);
}

#[actix_web::test]
async fn test_test_endpoint_evaluates_against_context() {
    let app = create_test_app().await;
    let context = json!({
        "roles": ["user"],
        "permissions": ["document:read"],
        "currentUser": { "deptId": 5 },
        "target": { "deptId": 5 }
    });

    let req = test::TestRequest::post()
        .uri("/permission-expressions/test")
        .set_json(json!({
            "expression": common::DOCUMENT_READ_EXPRESSION,
            "context": context.clone()
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["result"], true);
    assert_eq!(body["expression"], common::DOCUMENT_READ_EXPRESSION);
    assert_eq!(body["context"], context);
}

#[actix_web::test]
async fn test_test_endpoint_without_context_denies() {
    let app = create_test_app().await;

    let req = test::TestRequest::post()
        .uri("/permission-expressions/test")
        .set_json(json!({ "expression": "hasRole('admin')" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["result"], false);
    assert_eq!(body["context"], Value::Null);
}

#[actix_web::test]
async fn test_test_endpoint_invalid_expression_is_false() {
    let app = create_test_app().await;

    let req = test::TestRequest::post()
        .uri("/permission-expressions/test")
        .set_json(json!({
            "expression": "hasRole(",
            "context": { "roles": ["admin"] }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["result"], false);
}

#[actix_web::test]
async fn test_clear_cache_endpoint() {
    let service = test_service();
    let app = create_test_app_with(service.clone()).await;

    let req = test::TestRequest::post()
        .uri("/permission-expressions/test")
        .set_json(json!({ "expression": "true" }))
        .to_request();
    test::call_service(&app, req).await;
    assert!(!service.engine().cache().is_empty());

    let req = test::TestRequest::post()
        .uri("/permission-expressions/clear-cache")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["message"], "Permission expression cache cleared");
    assert!(service.engine().cache().is_empty());
}

#[actix_web::test]
async fn test_deeply_nested_expression_is_rejected() {
    let app = create_test_app().await;
    let deep = format!("{}true{}", "(".repeat(50_000), ")".repeat(50_000));

    let req = test::TestRequest::post()
        .uri("/permission-expressions/validate")
        .set_json(json!({ "expression": deep }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["valid"], false);

    let req = test::TestRequest::post()
        .uri("/permission-expressions/test")
        .set_json(json!({ "expression": format!("{}true", "!".repeat(50_000)) }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["result"], false);

    let req = test::TestRequest::post()
        .uri("/permission-expressions")
        .set_json(json!({ "permissionCode": "deep", "expression": deep }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
