//! Permission checks
//!
//! Run after a record is loaded (or, for creates, after the body is
//! validated) and before anything is written. Each failure is a 403 with a
//! method-specific code. Creating requires a self-managed Member; every
//! other method only requires that the record belongs to the caller's
//! Member.

use training_common::db::TenantScoped;

use crate::directory::Caller;
use crate::error::{ApiError, ApiResult};

pub mod cls;
pub mod student;
pub mod syllabus;

/// Fail with `code` unless `record` belongs to the caller's Member
pub(crate) fn require_tenant<T: TenantScoped>(
    caller: &Caller,
    record: &T,
    code: &'static str,
) -> ApiResult<()> {
    if record.resolve_tenant() == caller.member_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden(code))
    }
}

/// Fail with `code` unless the caller's Member is self-managed
pub(crate) fn require_self_managed(caller: &Caller, code: &'static str) -> ApiResult<()> {
    if caller.self_managed {
        Ok(())
    } else {
        Err(ApiError::Forbidden(code))
    }
}
