//! Permission expression repository trait and implementations.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use log::warn;
use parking_lot::RwLock;

use super::model::PermissionExpression;
use crate::http::error::PermissionError;

/// Trait for storing permission expressions.
///
/// Implement this trait to provide custom storage backends (database,
/// Redis, external service). Only the expression text matters to the
/// engine; the rest of the record is administrative metadata.
///
/// Permission codes are unique. `save` must check that atomically with the
/// write (a unique index, or a lock held across check and insert).
///
/// # Example
///
/// ```ignore
/// use actix_permission_core::http::security::permission::{
///     PermissionExpression, PermissionExpressionRepository,
/// };
///
/// struct DatabasePermissionRepository {
///     pool: DbPool,
/// }
///
/// impl PermissionExpressionRepository for DatabasePermissionRepository {
///     fn save(&self, expression: PermissionExpression) -> Result<PermissionExpression, PermissionError> {
///         // UNIQUE(permission_code) turns a concurrent duplicate into a constraint error
///         self.pool
///             .upsert("permission_expression", &expression)
///             .map_err(|_| PermissionError::DuplicateCode { code: expression.permission_code.clone() })
///     }
///
///     fn find_by_code(&self, code: &str) -> Option<PermissionExpression> {
///         self.pool
///             .query("SELECT * FROM permission_expression WHERE permission_code = ?", &[code])
///             .ok()
///             .map(|row| PermissionExpression::new(row.permission_code, row.expression)
///                 .name(row.name)
///                 .enabled(row.enabled))
///     }
///     // ...
/// }
/// ```
pub trait PermissionExpressionRepository: Send + Sync {
    /// Finds a record by id.
    fn find_by_id(&self, id: u64) -> Option<PermissionExpression>;

    /// Finds a record by its (unique) permission code.
    fn find_by_code(&self, code: &str) -> Option<PermissionExpression>;

    /// Returns every enabled record, ordered by id.
    fn find_all_enabled(&self) -> Vec<PermissionExpression>;

    /// Inserts (`id == 0`, a fresh id is assigned) or replaces a record.
    ///
    /// Fails with `DuplicateCode` if a record with another id already uses
    /// the permission code.
    fn save(&self, expression: PermissionExpression) -> Result<PermissionExpression, PermissionError>;

    /// Removes a record, returning it if it existed.
    fn delete_by_id(&self, id: u64) -> Option<PermissionExpression>;
}

/// In-memory implementation of `PermissionExpressionRepository`.
///
/// Useful for development, testing, and simple applications.
///
/// # Example
///
/// ```
/// use actix_permission_core::http::security::permission::{
///     InMemoryPermissionExpressionRepository, PermissionExpression,
///     PermissionExpressionRepository,
/// };
///
/// let repository = InMemoryPermissionExpressionRepository::new()
///     .with_expression(PermissionExpression::new("user:edit", "hasRole('admin')"))
///     .with_expression(PermissionExpression::new("user:view", "hasAnyRole('admin', 'user')"));
///
/// assert_eq!(repository.len(), 2);
/// assert!(repository.find_by_code("user:edit").is_some());
/// ```
#[derive(Debug)]
pub struct InMemoryPermissionExpressionRepository {
    expressions: RwLock<BTreeMap<u64, PermissionExpression>>,
    next_id: AtomicU64,
}

impl Default for InMemoryPermissionExpressionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPermissionExpressionRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            expressions: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Saves a record (builder pattern). A duplicate code is logged and
    /// skipped.
    pub fn with_expression(self, expression: PermissionExpression) -> Self {
        if let Err(err) = self.save(expression) {
            warn!("Skipping seeded permission expression: {}", err);
        }
        self
    }

    /// Returns the number of records, enabled or not.
    pub fn len(&self) -> usize {
        self.expressions.read().len()
    }

    /// Returns true if the repository is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns every record, enabled or not.
    pub fn find_all(&self) -> Vec<PermissionExpression> {
        self.expressions.read().values().cloned().collect()
    }
}

impl PermissionExpressionRepository for InMemoryPermissionExpressionRepository {
    fn find_by_id(&self, id: u64) -> Option<PermissionExpression> {
        self.expressions.read().get(&id).cloned()
    }

    fn find_by_code(&self, code: &str) -> Option<PermissionExpression> {
        self.expressions
            .read()
            .values()
            .find(|e| e.permission_code == code)
            .cloned()
    }

    fn find_all_enabled(&self) -> Vec<PermissionExpression> {
        self.expressions
            .read()
            .values()
            .filter(|e| e.enabled)
            .cloned()
            .collect()
    }

    fn save(
        &self,
        mut expression: PermissionExpression,
    ) -> Result<PermissionExpression, PermissionError> {
        let mut expressions = self.expressions.write();

        let taken = expressions
            .values()
            .any(|e| e.permission_code == expression.permission_code && e.id != expression.id);
        if taken {
            return Err(PermissionError::DuplicateCode {
                code: expression.permission_code,
            });
        }

        if expression.id == 0 {
            expression.id = self.next_id.fetch_add(1, Ordering::Relaxed);
        } else {
            self.next_id
                .fetch_max(expression.id.saturating_add(1), Ordering::Relaxed);
        }
        expressions.insert(expression.id, expression.clone());
        Ok(expression)
    }

    fn delete_by_id(&self, id: u64) -> Option<PermissionExpression> {
        self.expressions.write().remove(&id)
    }
}
