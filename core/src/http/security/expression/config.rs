//! Permission expression engine configuration.

use std::collections::HashSet;

/// Configuration for [`PermissionExpressionEngine`](super::PermissionExpressionEngine).
///
/// The default is lenient: unknown variables evaluate to `null` and
/// validation is syntax-only.
///
/// # Example
/// ```
/// use actix_permission_core::http::security::expression::EngineConfig;
///
/// let config = EngineConfig::new()
///     .strict_variables(true)
///     .strict_validation(true)
///     .declared_variables(["currentUser", "target"]);
///
/// assert!(config.is_strict_variables());
/// assert!(config.is_declared("target"));
/// assert!(!config.is_declared("other"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Missing variables/fields raise `UnknownVariable` instead of `null`.
    strict_variables: bool,
    /// Validation also resolves function names, arity and (when declared)
    /// variable names.
    strict_validation: bool,
    /// Variables an expression may reference. Empty means unrestricted.
    declared_variables: HashSet<String>,
}

impl EngineConfig {
    /// Creates a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether missing variables are an evaluation error.
    pub fn strict_variables(mut self, strict: bool) -> Self {
        self.strict_variables = strict;
        self
    }

    /// Sets whether validation runs the semantic pass.
    pub fn strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }

    /// Sets the variables strict validation accepts.
    pub fn declared_variables<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declared_variables = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_strict_variables(&self) -> bool {
        self.strict_variables
    }

    pub fn is_strict_validation(&self) -> bool {
        self.strict_validation
    }

    /// Checks a variable name against the declared set.
    pub fn is_declared(&self, name: &str) -> bool {
        self.declared_variables.is_empty() || self.declared_variables.contains(name)
    }
}
