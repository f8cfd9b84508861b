//! Class permissions

use sqlx::SqlitePool;
use training_common::db::{Cls, NewCls};

use super::{require_self_managed, require_tenant};
use crate::db;
use crate::directory::Caller;
use crate::error::{ApiError, ApiResult};

/// The chosen Syllabus must belong to the caller's Member
pub fn create(caller: &Caller, new: &NewCls) -> ApiResult<()> {
    require_self_managed(caller, "training_cls_create_201")?;
    require_tenant(caller, new, "training_cls_create_202")
}

pub fn read(caller: &Caller, cls: &Cls) -> ApiResult<()> {
    require_tenant(caller, cls, "training_cls_read_201")
}

pub fn update(caller: &Caller, cls: &Cls) -> ApiResult<()> {
    require_tenant(caller, cls, "training_cls_update_201")
}

/// Also refuses while the Class has a live Student
pub async fn delete(db: &SqlitePool, caller: &Caller, cls: &Cls) -> ApiResult<()> {
    require_tenant(caller, cls, "training_cls_delete_201")?;

    if db::cls::has_live_students(db, cls.id).await? {
        return Err(ApiError::Forbidden("training_cls_delete_202"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::fixtures;

    fn new_cls(member_id: i64) -> NewCls {
        let cls = fixtures::cls(member_id);
        NewCls {
            start_date: cls.start_date,
            finish_date: None,
            trainer: cls.trainer,
            syllabus: cls.syllabus,
        }
    }

    #[test]
    fn test_create_checks_self_managed_before_tenant() {
        assert!(create(&fixtures::caller(1, true), &new_cls(1)).is_ok());
        assert!(matches!(
            create(&fixtures::caller(1, false), &new_cls(2)),
            Err(ApiError::Forbidden("training_cls_create_201"))
        ));
        assert!(matches!(
            create(&fixtures::caller(1, true), &new_cls(2)),
            Err(ApiError::Forbidden("training_cls_create_202"))
        ));
    }

    #[test]
    fn test_tenant_resolved_through_syllabus() {
        let cls = fixtures::cls(3);

        assert!(read(&fixtures::caller(3, false), &cls).is_ok());
        assert!(matches!(
            update(&fixtures::caller(4, true), &cls),
            Err(ApiError::Forbidden("training_cls_update_201"))
        ));
    }
}
