//! Permission expression engine.
//!
//! Ties the cache, the evaluator and the validation rules together behind
//! the three operations collaborators use: `validate_expression`,
//! `evaluate` and `clear_cache`.

use std::sync::Arc;

use log::{debug, warn};

use super::ast::Expression;
use super::cache::CompiledExpressionCache;
use super::config::EngineConfig;
use super::context::EvaluationContext;
use super::error::{EvaluationError, ExpressionError};
use super::evaluator::ExpressionEvaluator;
use super::parser::CompiledExpression;
use super::root::{DefaultExpressionRoot, ExpressionRoot};

/// Parses, caches and evaluates permission expressions.
///
/// Cloning is cheap and every clone shares the same cache; construct one
/// engine per application and hand clones to whatever needs it.
///
/// # Example
/// ```
/// use actix_permission_core::http::security::expression::{
///     EvaluationContext, PermissionExpressionEngine,
/// };
///
/// let engine = PermissionExpressionEngine::new();
/// let ctx = EvaluationContext::new().permissions(["user:edit", "user:view"]);
///
/// assert!(engine.validate_expression("hasPermission('user:edit')"));
/// assert!(engine.evaluate("hasPermission('user:edit')", &ctx));
/// assert!(!engine.evaluate("hasPermission('user:delete')", &ctx));
/// ```
#[derive(Clone)]
pub struct PermissionExpressionEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    cache: CompiledExpressionCache,
    evaluator: ExpressionEvaluator,
    config: EngineConfig,
}

impl PermissionExpressionEngine {
    /// Creates an engine with the default configuration and functions.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Creates an engine with the default functions.
    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_root(config, DefaultExpressionRoot::new())
    }

    /// Creates an engine with a custom function registry.
    pub fn with_root<R: ExpressionRoot + 'static>(config: EngineConfig, root: R) -> Self {
        let evaluator =
            ExpressionEvaluator::with_root(root).strict_variables(config.is_strict_variables());

        PermissionExpressionEngine {
            inner: Arc::new(EngineInner {
                cache: CompiledExpressionCache::new(),
                evaluator,
                config,
            }),
        }
    }

    /// Returns true if `text` would be accepted for storage.
    ///
    /// Never fails: any syntax or semantic error yields `false`.
    pub fn validate_expression(&self, text: &str) -> bool {
        match self.check(text) {
            Ok(()) => true,
            Err(err) => {
                debug!("Rejected permission expression {:?}: {}", text, err);
                false
            }
        }
    }

    /// Validates `text` and reports why it was rejected.
    ///
    /// Parses without touching the cache. With strict validation enabled,
    /// function names and literal arity are resolved against the registry
    /// and variables against the declared set.
    pub fn check(&self, text: &str) -> Result<(), ExpressionError> {
        let compiled = CompiledExpression::parse(text)?;
        if self.inner.config.is_strict_validation() {
            self.check_semantics(compiled.ast())?;
        }
        Ok(())
    }

    fn check_semantics(&self, ast: &Expression) -> Result<(), EvaluationError> {
        let root = self.inner.evaluator.root();
        let config = &self.inner.config;
        let mut first_error = None;

        ast.walk(&mut |node| {
            if first_error.is_some() {
                return;
            }
            first_error = match node {
                Expression::FunctionCall { name, args } => match root.signature(name) {
                    None => Some(EvaluationError::UnknownFunction { name: name.clone() }),
                    Some(signature) if !signature.accepts(args.len()) => {
                        Some(EvaluationError::ArgumentCount {
                            function: name.clone(),
                            expected: signature.expected(),
                            found: args.len(),
                        })
                    }
                    Some(_) => None,
                },
                Expression::Variable(name) if !config.is_declared(name) => {
                    Some(EvaluationError::UnknownVariable { name: name.clone() })
                }
                _ => None,
            };
        });

        first_error.map_or(Ok(()), Err)
    }

    /// Evaluates `text` against `ctx`, reporting any failure.
    pub fn try_evaluate(&self, text: &str, ctx: &EvaluationContext) -> Result<bool, ExpressionError> {
        let compiled = self.inner.cache.get_or_compile(text)?;
        Ok(self.inner.evaluator.evaluate(compiled.ast(), ctx)?)
    }

    /// Evaluates `text` against `ctx`.
    ///
    /// Fail-closed: a syntax or evaluation error denies access and is
    /// logged.
    pub fn evaluate(&self, text: &str, ctx: &EvaluationContext) -> bool {
        match self.try_evaluate(text, ctx) {
            Ok(granted) => granted,
            Err(err) => {
                warn!("Permission expression {:?} denied access: {}", text, err);
                false
            }
        }
    }

    /// Drops every compiled expression.
    pub fn clear_cache(&self) {
        self.inner.cache.clear();
    }

    /// Drops the compiled form of a single expression.
    pub fn evict(&self, text: &str) -> bool {
        self.inner.cache.evict(text)
    }

    pub fn cache(&self) -> &CompiledExpressionCache {
        &self.inner.cache
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }
}

impl Default for PermissionExpressionEngine {
    fn default() -> Self {
        Self::new()
    }
}
