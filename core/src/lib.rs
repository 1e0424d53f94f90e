//! # Actix Permission
//!
//! Permission expressions for Actix Web: administrators store a boolean
//! expression per permission code (`hasRole('admin') || hasPermission('user:edit')`)
//! and request handlers evaluate it against the caller's roles, permissions
//! and arguments.
//!
//! - [`http::security::expression`] - lexer, parser, evaluator and compiled-expression cache
//! - [`http::security::permission`] - stored expressions, validation-gated administration and the HTTP admin surface
//! - [`http::error`] - HTTP-facing error types

pub mod http;
