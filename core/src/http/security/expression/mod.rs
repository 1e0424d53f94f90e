//! Permission Expression Language.
//!
//! # Overview
//! Administrators store a short boolean expression per permission code; at
//! request time the expression is evaluated against the caller's context
//! (roles, permissions, method arguments, target entity) to allow or deny.
//!
//! # Supported Expressions
//!
//! ## Built-in Functions
//! - `hasPermission('CODE')` - Check if the caller has the permission
//! - `hasRole('ROLE')` - Check if the caller has the role
//! - `hasAnyRole('ROLE1', 'ROLE2')` - Check if the caller has any of the roles
//! - `hasAllRoles('ROLE1', 'ROLE2')` - Check if the caller has all of the roles
//!
//! ## Operators
//! - `&&` / `and` - Logical AND (short-circuit)
//! - `||` / `or` - Logical OR (short-circuit)
//! - `!` / `not` - Logical NOT
//! - `==`, `!=`, `<`, `<=`, `>`, `>=` - Comparisons
//! - `(` `)` - Grouping
//!
//! ## Values
//! - `#name` - context variable, `#name.field.sub` - property path
//! - `'text'` / `"text"`, `42`, `3.5`, `true`, `false`, `null`
//!
//! # Examples
//! ```
//! use actix_permission_core::http::security::expression::{
//!     EvaluationContext, PermissionExpressionEngine, Value,
//! };
//!
//! let engine = PermissionExpressionEngine::new();
//! let ctx = EvaluationContext::new()
//!     .roles(["user"])
//!     .variable("currentUser", Value::object([("deptId", 5)]))
//!     .variable("target", Value::object([("deptId", 5)]));
//!
//! assert!(engine.evaluate(
//!     "hasRole('admin') || #currentUser.deptId == #target.deptId",
//!     &ctx,
//! ));
//! ```
//!
//! # Failure policy
//! `validate_expression` turns every error into `false`. `evaluate` is
//! fail-closed: a syntax error, unknown function or type mismatch denies.

mod ast;
mod cache;
mod config;
mod context;
mod engine;
mod error;
mod evaluator;
mod lexer;
mod parser;
mod root;
mod value;

pub use ast::{BinaryOp, Expression, Literal, UnaryOp};
pub use cache::CompiledExpressionCache;
pub use config::EngineConfig;
pub use context::EvaluationContext;
pub use engine::PermissionExpressionEngine;
pub use error::{EvaluationError, ExpressionError, SyntaxError};
pub use evaluator::ExpressionEvaluator;
pub use parser::CompiledExpression;
pub use root::{DefaultExpressionRoot, ExpressionRoot, FunctionSignature, BUILTIN_FUNCTIONS};
pub use value::{MapObject, ObjectValue, Value};
