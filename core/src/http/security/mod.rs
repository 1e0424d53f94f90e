//! Permission expressions for actix-web applications.
//!
//! # Module Structure
//!
//! - `expression` - Permission Expression Language (lexer, parser,
//!   evaluator, compiled-expression cache, engine)
//! - `permission` - Stored expressions per permission code, their service
//!   and the administrative HTTP routes

pub mod expression;
pub mod permission;

pub use expression::{EngineConfig, EvaluationContext, PermissionExpressionEngine};
pub use permission::{
    InMemoryPermissionExpressionRepository, PermissionExpression, PermissionExpressionRepository,
    PermissionExpressionService,
};
