//! Header-based caller context for handlers.

use std::future::{ready, Ready};
use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use crate::http::security::expression::{EvaluationContext, Value};

pub const ROLES_HEADER: &str = "X-Roles";
pub const PERMISSIONS_HEADER: &str = "X-Permissions";
pub const DEPT_ID_HEADER: &str = "X-Dept-Id";

/// Evaluation context built from request headers.
///
/// Stands in for an authentication layer in demos and tests:
/// - `X-Roles: admin, user` - comma-separated roles
/// - `X-Permissions: document:read` - comma-separated permissions
/// - `X-Dept-Id: 5` - exposed as `#currentUser.deptId`
///
/// Missing or malformed headers contribute nothing, so the caller simply
/// has fewer grants.
///
/// # Usage
/// ```ignore
/// #[get("/documents/{dept_id}")]
/// async fn document(caller: HeaderContext, ...) -> impl Responder {
///     let ctx = caller.into_inner().variable("target", ...);
///     service.check_permission("document:read", &ctx)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct HeaderContext(EvaluationContext);

impl HeaderContext {
    pub fn from_request_headers(req: &HttpRequest) -> Self {
        let mut ctx = EvaluationContext::new()
            .roles(header_list(req, ROLES_HEADER))
            .permissions(header_list(req, PERMISSIONS_HEADER));

        let dept_id = header_value(req, DEPT_ID_HEADER).and_then(|v| v.parse::<i64>().ok());
        if let Some(dept_id) = dept_id {
            ctx = ctx.variable("currentUser", Value::object([("deptId", dept_id)]));
        }

        HeaderContext(ctx)
    }

    pub fn into_inner(self) -> EvaluationContext {
        self.0
    }
}

impl Deref for HeaderContext {
    type Target = EvaluationContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for HeaderContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(HeaderContext::from_request_headers(req)))
    }
}

fn header_value<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
}

fn header_list(req: &HttpRequest, name: &str) -> Vec<String> {
    header_value(req, name)
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
