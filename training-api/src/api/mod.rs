//! HTTP API handlers for training-api
//!
//! Resource routes share one flow: load the live record (404), check
//! permissions (403), validate the body (400), then write. Create validates
//! before the permission check because the tenant comes from the body.

use training_common::api::{ListMetadata, ListResponse};

use crate::controllers::ListController;
use crate::error::{ApiError, ApiResult};

pub mod auth;
pub mod cls;
pub mod health;
pub mod student;
pub mod syllabus;

pub use auth::auth_middleware;
pub use cls::cls_routes;
pub use health::health_routes;
pub use student::student_routes;
pub use syllabus::syllabus_routes;

/// Parse a `:pk` path segment; anything but an integer cannot name a record
pub(crate) fn parse_pk(raw: &str, not_found: &'static str) -> ApiResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::NotFound(not_found))
}

/// Wrap one page of records with the metadata of the applied query
pub(crate) fn list_response<T>(
    content: Vec<T>,
    total_records: i64,
    controller: ListController,
) -> ListResponse<T> {
    ListResponse {
        content,
        metadata: ListMetadata {
            limit: controller.query.limit,
            order: controller.query.order.as_param(),
            page: controller.query.page,
            total_records,
            warnings: controller.warnings,
        },
    }
}
