//! Expression evaluator.
//!
//! Evaluates a permission expression AST against an evaluation context.

use std::cmp::Ordering;
use std::sync::Arc;

use super::ast::{BinaryOp, Expression, Literal, UnaryOp};
use super::context::EvaluationContext;
use super::error::{EvaluationError, ExpressionError};
use super::parser::CompiledExpression;
use super::root::{DefaultExpressionRoot, ExpressionRoot};
use super::value::Value;

/// Evaluates permission expressions against a context.
///
/// # Example
/// ```
/// use actix_permission_core::http::security::expression::{
///     CompiledExpression, EvaluationContext, ExpressionEvaluator,
/// };
///
/// let evaluator = ExpressionEvaluator::new();
/// let expr = CompiledExpression::parse("hasRole('admin') || hasRole('super_admin')").unwrap();
/// let ctx = EvaluationContext::new().roles(["user"]);
/// assert_eq!(evaluator.evaluate(expr.ast(), &ctx), Ok(false));
/// ```
pub struct ExpressionEvaluator {
    root: Arc<dyn ExpressionRoot>,
    strict_variables: bool,
}

impl ExpressionEvaluator {
    /// Creates a new evaluator with the default expression root.
    pub fn new() -> Self {
        ExpressionEvaluator {
            root: Arc::new(DefaultExpressionRoot::new()),
            strict_variables: false,
        }
    }

    /// Creates a new evaluator with a custom expression root.
    pub fn with_root<R: ExpressionRoot + 'static>(root: R) -> Self {
        ExpressionEvaluator {
            root: Arc::new(root),
            strict_variables: false,
        }
    }

    /// Makes missing variables and fields an `UnknownVariable` error
    /// instead of `null`.
    pub fn strict_variables(mut self, strict: bool) -> Self {
        self.strict_variables = strict;
        self
    }

    /// Returns the function registry used by this evaluator.
    pub fn root(&self) -> &dyn ExpressionRoot {
        self.root.as_ref()
    }

    /// Evaluates an expression against a context.
    ///
    /// # Returns
    /// * `Ok(true)` - Access granted
    /// * `Ok(false)` - Access denied
    /// * `Err(EvaluationError)` - Evaluation failed (unknown function, non-boolean result, etc.)
    pub fn evaluate(
        &self,
        expr: &Expression,
        ctx: &EvaluationContext,
    ) -> Result<bool, EvaluationError> {
        let value = self.eval(expr, ctx)?;
        value.as_bool().ok_or_else(|| {
            EvaluationError::type_mismatch(format!(
                "expression must evaluate to bool, found {}",
                value.type_name()
            ))
        })
    }

    /// Parses and evaluates an expression string.
    ///
    /// Convenience method that combines parsing and evaluation without
    /// caching; use [`PermissionExpressionEngine`](super::PermissionExpressionEngine)
    /// on request paths.
    pub fn evaluate_str(
        &self,
        expr: &str,
        ctx: &EvaluationContext,
    ) -> Result<bool, ExpressionError> {
        let parsed = CompiledExpression::parse(expr)?;
        Ok(self.evaluate(parsed.ast(), ctx)?)
    }

    fn eval(&self, expr: &Expression, ctx: &EvaluationContext) -> Result<Value, EvaluationError> {
        match expr {
            Expression::Literal(literal) => Ok(match literal {
                Literal::Null => Value::Null,
                Literal::Bool(b) => Value::Bool(*b),
                Literal::Number(n) => Value::Number(*n),
                Literal::String(s) => Value::String(s.clone()),
            }),

            Expression::Variable(name) => self.lookup_variable(name, ctx),

            Expression::PropertyAccess { base, path } => {
                let mut current = self.eval(base, ctx)?;
                let mut resolved = match base.as_ref() {
                    Expression::Variable(name) => name.clone(),
                    _ => String::new(),
                };

                for field in path {
                    resolved.push('.');
                    resolved.push_str(field);
                    current = match current.field(field) {
                        Some(value) => value,
                        None if self.strict_variables => {
                            return Err(EvaluationError::UnknownVariable { name: resolved })
                        }
                        None => Value::Null,
                    };
                }

                Ok(current)
            }

            Expression::FunctionCall { name, args } => self.call_function(name, args, ctx),

            Expression::Binary { left, op, right } => match op {
                BinaryOp::And => {
                    // Short-circuit: if left is false, don't evaluate right
                    if !self.eval_bool(left, ctx, "&&")? {
                        return Ok(Value::Bool(false));
                    }
                    self.eval_bool(right, ctx, "&&").map(Value::Bool)
                }
                BinaryOp::Or => {
                    // Short-circuit: if left is true, don't evaluate right
                    if self.eval_bool(left, ctx, "||")? {
                        return Ok(Value::Bool(true));
                    }
                    self.eval_bool(right, ctx, "||").map(Value::Bool)
                }
                op => {
                    let left = self.eval(left, ctx)?;
                    let right = self.eval(right, ctx)?;
                    compare(*op, &left, &right).map(Value::Bool)
                }
            },

            Expression::Unary { op, expr } => match op {
                UnaryOp::Not => self.eval_bool(expr, ctx, "!").map(|b| Value::Bool(!b)),
            },
        }
    }

    fn eval_bool(
        &self,
        expr: &Expression,
        ctx: &EvaluationContext,
        operator: &str,
    ) -> Result<bool, EvaluationError> {
        let value = self.eval(expr, ctx)?;
        value.as_bool().ok_or_else(|| {
            EvaluationError::type_mismatch(format!(
                "operand of '{}' must be bool, found {}",
                operator,
                value.type_name()
            ))
        })
    }

    fn lookup_variable(
        &self,
        name: &str,
        ctx: &EvaluationContext,
    ) -> Result<Value, EvaluationError> {
        match ctx.get(name) {
            Some(value) => Ok(value.clone()),
            None if self.strict_variables => Err(EvaluationError::UnknownVariable {
                name: name.to_string(),
            }),
            None => Ok(Value::Null),
        }
    }

    fn call_function(
        &self,
        name: &str,
        args: &[Expression],
        ctx: &EvaluationContext,
    ) -> Result<Value, EvaluationError> {
        let signature = self
            .root
            .signature(name)
            .ok_or_else(|| EvaluationError::UnknownFunction {
                name: name.to_string(),
            })?;

        if !signature.accepts(args.len()) {
            return Err(EvaluationError::ArgumentCount {
                function: name.to_string(),
                expected: signature.expected(),
                found: args.len(),
            });
        }

        let mut values = Vec::with_capacity(args.len());
        for (index, arg) in args.iter().enumerate() {
            match self.eval(arg, ctx)? {
                Value::String(s) => values.push(s),
                other => {
                    return Err(EvaluationError::type_mismatch(format!(
                        "argument {} of '{}' must be string, found {}",
                        index + 1,
                        name,
                        other.type_name()
                    )))
                }
            }
        }
        let values: Vec<&str> = values.iter().map(String::as_str).collect();

        self.root
            .evaluate_function(name, &values, ctx)
            .map(Value::Bool)
            .ok_or_else(|| EvaluationError::UnknownFunction {
                name: name.to_string(),
            })
    }
}

/// Comparison semantics.
///
/// A `null` operand makes every comparison false, `!=` included, so a
/// missing field can never satisfy a rule.
fn compare(op: BinaryOp, left: &Value, right: &Value) -> Result<bool, EvaluationError> {
    if left.is_null() || right.is_null() {
        return Ok(false);
    }

    if matches!(left, Value::Object(_)) || matches!(right, Value::Object(_)) {
        return Err(EvaluationError::type_mismatch(format!(
            "cannot compare {} with {} using '{}'",
            left.type_name(),
            right.type_name(),
            op.symbol()
        )));
    }

    match op {
        BinaryOp::Eq => Ok(left == right),
        BinaryOp::Neq => Ok(left != right),
        _ => {
            let ordering = match (left, right) {
                (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
                (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
                _ => {
                    return Err(EvaluationError::type_mismatch(format!(
                        "cannot order {} and {} using '{}'",
                        left.type_name(),
                        right.type_name(),
                        op.symbol()
                    )))
                }
            };

            Ok(match (op, ordering) {
                (_, None) => false,
                (BinaryOp::Lt, Some(o)) => o == Ordering::Less,
                (BinaryOp::Le, Some(o)) => o != Ordering::Greater,
                (BinaryOp::Gt, Some(o)) => o == Ordering::Greater,
                (BinaryOp::Ge, Some(o)) => o != Ordering::Less,
                _ => false,
            })
        }
    }
}

impl Default for ExpressionEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ExpressionEvaluator {
    fn clone(&self) -> Self {
        ExpressionEvaluator {
            root: Arc::clone(&self.root),
            strict_variables: self.strict_variables,
        }
    }
}
