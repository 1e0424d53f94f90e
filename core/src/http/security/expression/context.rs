//! Evaluation context for permission expressions.
//!
//! The context is built by the caller for every evaluation: the roles and
//! permissions of the principal (resolved once, at session establishment)
//! and any named bindings such as method arguments or the `target` entity.
//! The engine only reads it.

use std::collections::{HashMap, HashSet};

use super::value::Value;

/// Read-only variable bindings an expression is evaluated against.
///
/// # Example
/// ```
/// use actix_permission_core::http::security::expression::{EvaluationContext, Value};
///
/// let ctx = EvaluationContext::new()
///     .roles(["user"])
///     .permissions(["user:edit", "user:view"])
///     .variable("currentUser", Value::object([("deptId", 5)]));
///
/// assert!(ctx.has_role("user"));
/// assert!(ctx.has_permission("user:edit"));
/// assert!(ctx.get("currentUser").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EvaluationContext {
    roles: HashSet<String>,
    permissions: HashSet<String>,
    variables: HashMap<String, Value>,
}

impl EvaluationContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a context from a JSON object.
    ///
    /// `roles` and `permissions` must be arrays of strings (other entries
    /// are ignored); every other key becomes a variable. A non-object
    /// yields an empty context.
    ///
    /// ```
    /// use actix_permission_core::http::security::expression::EvaluationContext;
    /// use serde_json::json;
    ///
    /// let ctx = EvaluationContext::from_json(&json!({
    ///     "roles": ["admin"],
    ///     "target": { "deptId": 7 }
    /// }));
    /// assert!(ctx.has_role("admin"));
    /// assert!(ctx.get("target").is_some());
    /// ```
    pub fn from_json(json: &serde_json::Value) -> Self {
        let mut ctx = EvaluationContext::new();
        let Some(map) = json.as_object() else {
            return ctx;
        };

        for (key, value) in map {
            match key.as_str() {
                "roles" => ctx.roles.extend(string_items(value)),
                "permissions" => ctx.permissions.extend(string_items(value)),
                _ => {
                    ctx.variables.insert(key.clone(), Value::from(value.clone()));
                }
            }
        }

        ctx
    }

    /// Adds roles (builder pattern).
    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    /// Adds permissions (builder pattern).
    pub fn permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions
            .extend(permissions.into_iter().map(Into::into));
        self
    }

    /// Binds a named variable (builder pattern).
    pub fn variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Checks if the principal has a specific role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Checks if the principal has a specific permission.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// Returns a bound variable.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn get_roles(&self) -> &HashSet<String> {
        &self.roles
    }

    pub fn get_permissions(&self) -> &HashSet<String> {
        &self.permissions
    }
}

fn string_items(value: &serde_json::Value) -> impl Iterator<Item = String> + '_ {
    value
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|item| item.as_str().map(str::to_string))
}
