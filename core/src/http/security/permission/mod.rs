//! Stored permission expressions and their administration.
//!
//! # Overview
//!
//! Each permission code (`user:edit`, `document:read`) maps to one
//! expression. The service validates every expression before it is stored
//! and keeps the engine's compiled cache in step with the repository.
//!
//! # Routes
//!
//! [`configure`] mounts, under `/permission-expressions`:
//! - `GET /` - enabled records
//! - `GET /code/{code}` - one record by code
//! - `POST /` - create
//! - `PUT /{id}` - update
//! - `DELETE /{id}` - delete
//! - `POST /validate` - syntax check
//! - `POST /test` - evaluate against an ad-hoc JSON context
//! - `POST /clear-cache` - drop every compiled expression
//!
//! [`HeaderContext`] builds an `EvaluationContext` from `X-Roles`,
//! `X-Permissions` and `X-Dept-Id` headers for demos and tests.
//!
//! # Usage
//!
//! ```ignore
//! use actix_permission_core::http::security::expression::PermissionExpressionEngine;
//! use actix_permission_core::http::security::permission::{
//!     self, InMemoryPermissionExpressionRepository, PermissionExpression,
//!     PermissionExpressionService,
//! };
//!
//! let repository = InMemoryPermissionExpressionRepository::new()
//!     .with_expression(PermissionExpression::new("user:edit", "hasRole('admin')"));
//! let service = PermissionExpressionService::new(repository, PermissionExpressionEngine::new());
//!
//! HttpServer::new(move || {
//!     App::new()
//!         .app_data(web::Data::new(service.clone()))
//!         .configure(permission::configure)
//! })
//! ```

mod extractor;
mod handlers;
mod model;
mod repository;
mod service;

pub use extractor::{HeaderContext, DEPT_ID_HEADER, PERMISSIONS_HEADER, ROLES_HEADER};
pub use handlers::{
    configure, MessageResponse, TestRequest, TestResponse, ValidateRequest, ValidateResponse,
};
pub use model::{PermissionExpression, PermissionExpressionRequest};
pub use repository::{InMemoryPermissionExpressionRepository, PermissionExpressionRepository};
pub use service::PermissionExpressionService;
