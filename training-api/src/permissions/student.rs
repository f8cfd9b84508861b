//! Student permissions

use training_common::db::{NewStudent, Student};

use super::{require_self_managed, require_tenant};
use crate::directory::Caller;
use crate::error::ApiResult;

/// The chosen Class must belong to the caller's Member
pub fn create(caller: &Caller, new: &NewStudent) -> ApiResult<()> {
    require_self_managed(caller, "training_student_create_201")?;
    require_tenant(caller, new, "training_student_create_202")
}

pub fn read(caller: &Caller, student: &Student) -> ApiResult<()> {
    require_tenant(caller, student, "training_student_read_201")
}

pub fn update(caller: &Caller, student: &Student) -> ApiResult<()> {
    require_tenant(caller, student, "training_student_update_201")
}

pub fn delete(caller: &Caller, student: &Student) -> ApiResult<()> {
    require_tenant(caller, student, "training_student_delete_201")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::permissions::fixtures;

    #[test]
    fn test_tenant_resolved_through_class_and_syllabus() {
        let student = fixtures::student(8);

        assert!(read(&fixtures::caller(8, false), &student).is_ok());
        assert!(delete(&fixtures::caller(8, false), &student).is_ok());
        assert!(matches!(
            delete(&fixtures::caller(9, true), &student),
            Err(ApiError::Forbidden("training_student_delete_201"))
        ));
    }

    #[test]
    fn test_create_requires_class_in_member() {
        let new = NewStudent {
            cls: fixtures::cls(8),
            user_id: 5,
            notes: String::new(),
        };

        assert!(create(&fixtures::caller(8, true), &new).is_ok());
        assert!(matches!(
            create(&fixtures::caller(9, true), &new),
            Err(ApiError::Forbidden("training_student_create_202"))
        ));
    }
}
