//! Department documents, guarded by the `document:read` expression.

use actix_web::{get, web, HttpResponse, Responder};
use log::debug;
use serde::Serialize;

use actix_permission_core::http::security::expression::Value;
use actix_permission_core::http::security::permission::{HeaderContext, PermissionExpressionService};

pub const DOCUMENT_READ: &str = "document:read";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentList {
    dept_id: i64,
    documents: Vec<String>,
}

/// Lists a department's documents.
///
/// `#target.deptId` is the path segment; the caller comes from headers.
#[get("/documents/{dept_id}")]
pub async fn department_documents(
    service: web::Data<PermissionExpressionService>,
    caller: HeaderContext,
    dept_id: web::Path<i64>,
) -> impl Responder {
    let dept_id = dept_id.into_inner();
    let ctx = caller
        .into_inner()
        .variable("target", Value::object([("deptId", dept_id)]));

    if !service.check_permission(DOCUMENT_READ, &ctx) {
        debug!("Denied {} on department {}", DOCUMENT_READ, dept_id);
        return HttpResponse::Forbidden().finish();
    }

    HttpResponse::Ok().json(DocumentList {
        dept_id,
        documents: vec![
            format!("dept-{}-handbook.pdf", dept_id),
            format!("dept-{}-budget.xlsx", dept_id),
        ],
    })
}
