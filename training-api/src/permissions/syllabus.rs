//! Syllabus permissions

use sqlx::SqlitePool;
use training_common::db::Syllabus;

use super::{require_self_managed, require_tenant};
use crate::db;
use crate::directory::Caller;
use crate::error::{ApiError, ApiResult};

pub fn create(caller: &Caller) -> ApiResult<()> {
    require_self_managed(caller, "training_syllabus_create_201")
}

pub fn read(caller: &Caller, syllabus: &Syllabus) -> ApiResult<()> {
    require_tenant(caller, syllabus, "training_syllabus_read_201")
}

pub fn update(caller: &Caller, syllabus: &Syllabus) -> ApiResult<()> {
    require_tenant(caller, syllabus, "training_syllabus_update_201")
}

/// Also refuses while any Class of the Syllabus has a live Student
pub async fn delete(db: &SqlitePool, caller: &Caller, syllabus: &Syllabus) -> ApiResult<()> {
    require_tenant(caller, syllabus, "training_syllabus_delete_201")?;

    if db::syllabus::has_live_students(db, syllabus.id).await? {
        return Err(ApiError::Forbidden("training_syllabus_delete_202"));
    }
    Ok(())
}
