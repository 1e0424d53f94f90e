//! Permission expression service.
//!
//! Every mutation passes validation before it reaches the repository, and
//! every mutation evicts the compiled form of the text it replaces.

use std::sync::Arc;

use log::{debug, info};

use super::model::{PermissionExpression, PermissionExpressionRequest};
use super::repository::PermissionExpressionRepository;
use crate::http::error::PermissionError;
use crate::http::security::expression::{EvaluationContext, PermissionExpressionEngine};

/// Administration and checking of stored permission expressions.
///
/// # Example
/// ```
/// use actix_permission_core::http::security::expression::{
///     EvaluationContext, PermissionExpressionEngine,
/// };
/// use actix_permission_core::http::security::permission::{
///     InMemoryPermissionExpressionRepository, PermissionExpressionRequest,
///     PermissionExpressionService,
/// };
///
/// let service = PermissionExpressionService::new(
///     InMemoryPermissionExpressionRepository::new(),
///     PermissionExpressionEngine::new(),
/// );
///
/// service
///     .create(PermissionExpressionRequest {
///         permission_code: "user:edit".into(),
///         name: "Edit users".into(),
///         expression: "hasRole('admin') || hasPermission('user:edit')".into(),
///         enabled: true,
///     })
///     .unwrap();
///
/// let ctx = EvaluationContext::new().roles(["admin"]);
/// assert!(service.check_permission("user:edit", &ctx));
/// ```
#[derive(Clone)]
pub struct PermissionExpressionService {
    repository: Arc<dyn PermissionExpressionRepository>,
    engine: PermissionExpressionEngine,
}

impl PermissionExpressionService {
    pub fn new<R>(repository: R, engine: PermissionExpressionEngine) -> Self
    where
        R: PermissionExpressionRepository + 'static,
    {
        Self::with_repository(Arc::new(repository), engine)
    }

    /// Creates a service over a shared repository.
    pub fn with_repository(
        repository: Arc<dyn PermissionExpressionRepository>,
        engine: PermissionExpressionEngine,
    ) -> Self {
        PermissionExpressionService { repository, engine }
    }

    pub fn engine(&self) -> &PermissionExpressionEngine {
        &self.engine
    }

    /// Returns every enabled record.
    pub fn list_enabled(&self) -> Vec<PermissionExpression> {
        self.repository.find_all_enabled()
    }

    /// Fetches a record by permission code.
    pub fn get_by_code(&self, code: &str) -> Result<PermissionExpression, PermissionError> {
        self.repository
            .find_by_code(code)
            .ok_or_else(|| PermissionError::not_found_code(code))
    }

    /// Validates and stores a new record.
    ///
    /// Code uniqueness is enforced by the repository write, so concurrent
    /// creates of one code store exactly one record.
    pub fn create(
        &self,
        request: PermissionExpressionRequest,
    ) -> Result<PermissionExpression, PermissionError> {
        self.ensure_valid(&request.expression)?;

        let saved = self.repository.save(request.into_record(0))?;
        info!(
            "Created permission expression {} ({}): {}",
            saved.id, saved.permission_code, saved.expression
        );
        Ok(saved)
    }

    /// Validates and replaces an existing record.
    pub fn update(
        &self,
        id: u64,
        request: PermissionExpressionRequest,
    ) -> Result<PermissionExpression, PermissionError> {
        let existing = self
            .repository
            .find_by_id(id)
            .ok_or_else(|| PermissionError::not_found_id(id))?;

        self.ensure_valid(&request.expression)?;

        let saved = self.repository.save(request.into_record(id))?;
        self.engine.evict(&existing.expression);
        info!(
            "Updated permission expression {} ({}): {}",
            saved.id, saved.permission_code, saved.expression
        );
        Ok(saved)
    }

    /// Removes a record and its compiled expression.
    pub fn delete(&self, id: u64) -> Result<(), PermissionError> {
        let removed = self
            .repository
            .delete_by_id(id)
            .ok_or_else(|| PermissionError::not_found_id(id))?;

        self.engine.evict(&removed.expression);
        info!(
            "Deleted permission expression {} ({})",
            removed.id, removed.permission_code
        );
        Ok(())
    }

    /// Syntax check, as exposed by the `/validate` endpoint.
    pub fn validate(&self, expression: &str) -> bool {
        self.engine.validate_expression(expression)
    }

    /// Evaluates an ad-hoc expression, as exposed by the `/test` endpoint.
    pub fn test(&self, expression: &str, ctx: &EvaluationContext) -> bool {
        self.engine.evaluate(expression, ctx)
    }

    pub fn clear_cache(&self) {
        self.engine.clear_cache();
        info!("Permission expression cache cleared");
    }

    /// Decides a permission code for a caller.
    ///
    /// Unknown or disabled codes deny.
    pub fn check_permission(&self, code: &str, ctx: &EvaluationContext) -> bool {
        match self.repository.find_by_code(code) {
            Some(record) if record.enabled => self.engine.evaluate(&record.expression, ctx),
            Some(_) => {
                debug!("Permission expression for '{}' is disabled, denying", code);
                false
            }
            None => {
                debug!("No permission expression for '{}', denying", code);
                false
            }
        }
    }

    fn ensure_valid(&self, expression: &str) -> Result<(), PermissionError> {
        self.engine
            .check(expression)
            .map_err(|err| PermissionError::InvalidExpression {
                expression: expression.to_string(),
                reason: err.to_string(),
            })
    }
}
