//! Stored permission expression records.

use serde::{Deserialize, Serialize};

/// A permission code and the expression that decides it.
///
/// `id` is assigned by the repository on first save; `0` means unsaved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionExpression {
    pub id: u64,
    pub permission_code: String,
    pub name: String,
    pub expression: String,
    pub enabled: bool,
}

impl PermissionExpression {
    /// Creates an unsaved, enabled record.
    pub fn new(permission_code: impl Into<String>, expression: impl Into<String>) -> Self {
        PermissionExpression {
            id: 0,
            permission_code: permission_code.into(),
            name: String::new(),
            expression: expression.into(),
            enabled: true,
        }
    }

    /// Sets the display name (builder pattern).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the enabled flag (builder pattern).
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Body of create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionExpressionRequest {
    pub permission_code: String,
    #[serde(default)]
    pub name: String,
    pub expression: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl PermissionExpressionRequest {
    pub(crate) fn into_record(self, id: u64) -> PermissionExpression {
        PermissionExpression {
            id,
            permission_code: self.permission_code,
            name: self.name,
            expression: self.expression,
            enabled: self.enabled,
        }
    }
}
