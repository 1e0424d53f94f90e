//! Function registry for permission expressions.
//!
//! The builtin table is fixed; `ExpressionRoot` exists so an embedding
//! application (or a test) can wrap it, not to load functions at runtime.

use super::context::EvaluationContext;

/// Name and arity of a registered function.
///
/// Every argument of a registered function is a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: &'static str,
    pub min_args: usize,
    /// `None` for variadic functions.
    pub max_args: Option<usize>,
}

impl FunctionSignature {
    /// A function taking exactly `arity` arguments.
    pub const fn exact(name: &'static str, arity: usize) -> Self {
        FunctionSignature {
            name,
            min_args: arity,
            max_args: Some(arity),
        }
    }

    /// A function taking `min_args` or more arguments.
    pub const fn variadic(name: &'static str, min_args: usize) -> Self {
        FunctionSignature {
            name,
            min_args,
            max_args: None,
        }
    }

    /// Checks an argument count against this signature.
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min_args && self.max_args.map_or(true, |max| count <= max)
    }

    /// Describes the accepted argument count, e.g. `"1"` or `"at least 1"`.
    pub fn expected(&self) -> String {
        match self.max_args {
            Some(max) if max == self.min_args => max.to_string(),
            Some(max) => format!("{} to {}", self.min_args, max),
            None => format!("at least {}", self.min_args),
        }
    }
}

/// The builtin functions.
pub const BUILTIN_FUNCTIONS: [FunctionSignature; 4] = [
    FunctionSignature::exact("hasPermission", 1),
    FunctionSignature::exact("hasRole", 1),
    FunctionSignature::variadic("hasAnyRole", 1),
    FunctionSignature::variadic("hasAllRoles", 1),
];

/// Trait for resolving and evaluating expression functions.
///
/// The evaluator looks up the signature first (unknown name, wrong arity),
/// evaluates the arguments to strings, then calls `evaluate_function`.
///
/// # Example
/// ```
/// use actix_permission_core::http::security::expression::{
///     DefaultExpressionRoot, EvaluationContext, ExpressionRoot, FunctionSignature,
/// };
///
/// struct TenantExpressionRoot {
///     default: DefaultExpressionRoot,
///     tenant: String,
/// }
///
/// impl ExpressionRoot for TenantExpressionRoot {
///     fn signature(&self, name: &str) -> Option<FunctionSignature> {
///         match name {
///             "inTenant" => Some(FunctionSignature::exact("inTenant", 1)),
///             _ => self.default.signature(name),
///         }
///     }
///
///     fn evaluate_function(
///         &self,
///         name: &str,
///         args: &[&str],
///         context: &EvaluationContext,
///     ) -> Option<bool> {
///         match name {
///             "inTenant" => Some(args.first() == Some(&self.tenant.as_str())),
///             _ => self.default.evaluate_function(name, args, context),
///         }
///     }
/// }
/// ```
pub trait ExpressionRoot: Send + Sync {
    /// Returns the signature of a registered function, `None` if unknown.
    fn signature(&self, name: &str) -> Option<FunctionSignature>;

    /// Evaluates a function whose arguments already passed the signature
    /// check.
    ///
    /// # Returns
    /// * `Some(true)` - Function evaluated to true
    /// * `Some(false)` - Function evaluated to false
    /// * `None` - Unknown function
    fn evaluate_function(
        &self,
        name: &str,
        args: &[&str],
        context: &EvaluationContext,
    ) -> Option<bool>;
}

/// Default implementation backed by [`BUILTIN_FUNCTIONS`]:
/// - `hasPermission(code)` - permission membership
/// - `hasRole(role)` - role membership
/// - `hasAnyRole(role1, role2, ...)` - any of the roles
/// - `hasAllRoles(role1, role2, ...)` - all of the roles
#[derive(Debug, Clone, Default)]
pub struct DefaultExpressionRoot;

impl DefaultExpressionRoot {
    /// Creates a new default expression root.
    pub fn new() -> Self {
        DefaultExpressionRoot
    }
}

impl ExpressionRoot for DefaultExpressionRoot {
    fn signature(&self, name: &str) -> Option<FunctionSignature> {
        BUILTIN_FUNCTIONS.iter().find(|f| f.name == name).copied()
    }

    fn evaluate_function(
        &self,
        name: &str,
        args: &[&str],
        context: &EvaluationContext,
    ) -> Option<bool> {
        match name {
            "hasPermission" => {
                let permission = args.first()?;
                Some(context.has_permission(permission))
            }
            "hasRole" => {
                let role = args.first()?;
                Some(context.has_role(role))
            }
            "hasAnyRole" => Some(args.iter().any(|role| context.has_role(role))),
            // An empty list never grants.
            "hasAllRoles" => {
                Some(!args.is_empty() && args.iter().all(|role| context.has_role(role)))
            }
            _ => None,
        }
    }
}
