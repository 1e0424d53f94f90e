//! Administrative routes for permission expressions.
//!
//! Mount with [`configure`]; the handlers expect a
//! `web::Data<PermissionExpressionService>` in the application data.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};

use super::model::PermissionExpressionRequest;
use super::service::PermissionExpressionService;
use crate::http::error::PermissionError;
use crate::http::security::expression::EvaluationContext;

/// Body of `POST /validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateRequest {
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub expression: String,
}

/// Body of `POST /test`.
///
/// `context` holds `roles` and `permissions` arrays; every other key becomes
/// a `#variable`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRequest {
    pub expression: String,
    #[serde(default)]
    pub context: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResponse {
    pub result: bool,
    pub expression: String,
    pub context: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Registers every route under `/permission-expressions`.
///
/// # Example
/// ```ignore
/// App::new()
///     .app_data(web::Data::new(service))
///     .configure(permission::configure)
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/permission-expressions")
            .service(
                web::resource("")
                    .route(web::get().to(list_enabled))
                    .route(web::post().to(create)),
            )
            .service(get_by_code)
            .service(validate)
            .service(test_expression)
            .service(clear_cache)
            .service(update)
            .service(delete_expression),
    );
}

/// `GET /permission-expressions`
pub async fn list_enabled(
    service: web::Data<PermissionExpressionService>,
) -> Result<HttpResponse, PermissionError> {
    Ok(HttpResponse::Ok().json(service.list_enabled()))
}

#[get("/code/{code}")]
pub async fn get_by_code(
    service: web::Data<PermissionExpressionService>,
    code: web::Path<String>,
) -> Result<HttpResponse, PermissionError> {
    let record = service.get_by_code(&code)?;
    Ok(HttpResponse::Ok().json(record))
}

/// `POST /permission-expressions`
pub async fn create(
    service: web::Data<PermissionExpressionService>,
    body: web::Json<PermissionExpressionRequest>,
) -> Result<HttpResponse, PermissionError> {
    let record = service.create(body.into_inner())?;
    Ok(HttpResponse::Ok().json(record))
}

#[put("/{id}")]
pub async fn update(
    service: web::Data<PermissionExpressionService>,
    id: web::Path<u64>,
    body: web::Json<PermissionExpressionRequest>,
) -> Result<HttpResponse, PermissionError> {
    let record = service.update(id.into_inner(), body.into_inner())?;
    Ok(HttpResponse::Ok().json(record))
}

#[delete("/{id}")]
pub async fn delete_expression(
    service: web::Data<PermissionExpressionService>,
    id: web::Path<u64>,
) -> Result<HttpResponse, PermissionError> {
    service.delete(id.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/validate")]
pub async fn validate(
    service: web::Data<PermissionExpressionService>,
    body: web::Json<ValidateRequest>,
) -> Result<HttpResponse, PermissionError> {
    let ValidateRequest { expression } = body.into_inner();
    let valid = service.validate(&expression);
    Ok(HttpResponse::Ok().json(ValidateResponse { valid, expression }))
}

#[post("/test")]
pub async fn test_expression(
    service: web::Data<PermissionExpressionService>,
    body: web::Json<TestRequest>,
) -> Result<HttpResponse, PermissionError> {
    let TestRequest {
        expression,
        context,
    } = body.into_inner();

    let ctx = EvaluationContext::from_json(&context);
    let result = service.test(&expression, &ctx);

    Ok(HttpResponse::Ok().json(TestResponse {
        result,
        expression,
        context,
    }))
}

#[post("/clear-cache")]
pub async fn clear_cache(
    service: web::Data<PermissionExpressionService>,
) -> Result<HttpResponse, PermissionError> {
    service.clear_cache();
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Permission expression cache cleared".to_string(),
    }))
}
