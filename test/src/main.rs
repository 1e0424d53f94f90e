//! Actix Permission Demo Application
//!
//! Stores permission expressions in memory, mounts the administrative routes
//! and guards `/documents/{dept_id}` with the `document:read` expression.

mod handlers;

use std::env;

use actix_web::{web, App, HttpServer};
use log::info;

use actix_permission_core::http::security::expression::{EngineConfig, PermissionExpressionEngine};
use actix_permission_core::http::security::permission::{
    self, InMemoryPermissionExpressionRepository, PermissionExpression,
    PermissionExpressionService,
};

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";

/// Reads engine settings from the environment.
///
/// `PERMISSION_STRICT=true` turns on strict variables and strict validation.
fn engine_config() -> EngineConfig {
    let strict = env::var("PERMISSION_STRICT")
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);

    EngineConfig::new()
        .strict_variables(strict)
        .strict_validation(strict)
}

/// Seeds the repository with the demo expressions.
fn repository() -> InMemoryPermissionExpressionRepository {
    InMemoryPermissionExpressionRepository::new()
        .with_expression(
            PermissionExpression::new(
                handlers::documents::DOCUMENT_READ,
                "hasRole('admin') || (hasPermission('document:read') && #currentUser.deptId == #target.deptId)",
            )
            .name("Read department documents"),
        )
        .with_expression(
            PermissionExpression::new("user:edit", "hasRole('admin') || hasPermission('user:edit')")
                .name("Edit users"),
        )
        .with_expression(
            PermissionExpression::new("report:export", "hasAllRoles('manager', 'auditor')")
                .name("Export reports"),
        )
}

fn print_startup_info(bind_address: &str) {
    println!("=== Actix Permission Demo ===");
    println!();
    println!("Server: http://{}", bind_address);
    println!();
    println!("Caller headers:");
    println!("  X-Roles: admin,user");
    println!("  X-Permissions: document:read");
    println!("  X-Dept-Id: 5");
    println!();
    println!("Routes:");
    println!("  GET    /documents/{{dept_id}}                  - guarded by 'document:read'");
    println!("  GET    /permission-expressions                - enabled expressions");
    println!("  GET    /permission-expressions/code/{{code}}    - one expression");
    println!("  POST   /permission-expressions                - create");
    println!("  PUT    /permission-expressions/{{id}}           - update");
    println!("  DELETE /permission-expressions/{{id}}           - delete");
    println!("  POST   /permission-expressions/validate       - syntax check");
    println!("  POST   /permission-expressions/test           - evaluate against a JSON context");
    println!("  POST   /permission-expressions/clear-cache    - drop compiled expressions");
    println!();
    println!("Examples:");
    println!("  curl -H 'X-Permissions: document:read' -H 'X-Dept-Id: 5' http://{}/documents/5", bind_address);
    println!("  curl -H 'X-Permissions: document:read' -H 'X-Dept-Id: 5' http://{}/documents/6  # 403", bind_address);
    println!();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
    let config = engine_config();
    info!(
        "Permission engine: strict variables = {}, strict validation = {}",
        config.is_strict_variables(),
        config.is_strict_validation()
    );

    let service = PermissionExpressionService::new(
        repository(),
        PermissionExpressionEngine::with_config(config),
    );

    print_startup_info(&bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(service.clone()))
            .configure(permission::configure)
            .service(handlers::documents::department_documents)
    })
    .bind(bind_address.as_str())?
    .run()
    .await
}
