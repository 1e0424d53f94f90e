//! Access decided by stored expressions at request time.
//!
//! `/documents/{dept_id}` is guarded by `document:read`:
//! `hasRole('admin') || (hasPermission('document:read') && #currentUser.deptId == #target.deptId)`


use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::json;

use actix_permission_core::http::security::expression::EngineConfig;

use common::{create_test_app, create_test_app_with, test_service, test_service_with_config};

// =============================================================================
// Role and Permission Checks
// =============================================================================

#[actix_web::test]
async fn test_admin_reads_any_department() {
    let app = create_test_app().await;

    let req = test::TestRequest::get()
        .uri("/documents/9")
        .insert_header(("X-Roles", "admin"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_reader_in_same_department() {
    let app = create_test_app().await;

    let req = test::TestRequest::get()
        .uri("/documents/5")
        .insert_header(("X-Permissions", "document:read"))
        .insert_header(("X-Dept-Id", "5"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_reader_in_other_department_forbidden() {
    let app = create_test_app().await;

    let req = test::TestRequest::get()
        .uri("/documents/6")
        .insert_header(("X-Permissions", "document:read"))
        .insert_header(("X-Dept-Id", "5"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_reader_without_department_forbidden() {
    let app = create_test_app().await;

    // #currentUser is missing, so #currentUser.deptId is null and the
    // comparison is false
    let req = test::TestRequest::get()
        .uri("/documents/5")
        .insert_header(("X-Permissions", "document:read"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_anonymous_forbidden() {
    let app = create_test_app().await;

    let req = test::TestRequest::get().uri("/documents/5").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_strict_variables_deny_missing_department() {
    let app =
        create_test_app_with(test_service_with_config(EngineConfig::new().strict_variables(true)))
            .await;

    let req = test::TestRequest::get()
        .uri("/documents/5")
        .insert_header(("X-Permissions", "document:read"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Admin short-circuits before the variables are read
    let req = test::TestRequest::get()
        .uri("/documents/5")
        .insert_header(("X-Roles", "admin"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

// =============================================================================
// Disabled and Changed Expressions
// =============================================================================

#[actix_web::test]
async fn test_disabled_expression_denies() {
    let app = create_test_app().await;

    // report:export is stored as `true` but disabled
    let req = test::TestRequest::get()
        .uri("/reports/export")
        .insert_header(("X-Roles", "admin"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_update_takes_effect_on_next_request() {
    let service = test_service();
    let app = create_test_app_with(service.clone()).await;

    let reader = || {
        test::TestRequest::get()
            .uri("/documents/6")
            .insert_header(("X-Permissions", "document:read"))
            .insert_header(("X-Dept-Id", "5"))
            .to_request()
    };

    let resp = test::call_service(&app, reader()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri("/permission-expressions/1")
        .set_json(json!({
            "permissionCode": "document:read",
            "expression": "hasPermission('document:read')"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, reader()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!service
        .engine()
        .cache()
        .contains(common::DOCUMENT_READ_EXPRESSION));
}

#[actix_web::test]
async fn test_repeated_requests_compile_once() {
    let service = test_service();
    let app = create_test_app_with(service.clone()).await;

    for _ in 0..20 {
        let req = test::TestRequest::get()
            .uri("/documents/5")
            .insert_header(("X-Roles", "admin"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    assert_eq!(service.engine().cache().compile_count(), 1);
}
