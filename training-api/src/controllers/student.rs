//! Student create/update validation
//!
//! `user_id` must name a user the caller can read in the membership
//! service. Any failed lookup, including an unreachable service, rejects
//! the field.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::warn;
use training_common::db::{Cls, NewStudent, Student};

use super::fields::{optional_text, positive_id};
use super::list::{FieldKind, ListMeta, SearchField};
use super::{Controller, FieldOutcome, Mutation};
use crate::db;
use crate::directory::{Caller, Directory};
use crate::error::{ApiError, ApiResult, FieldErrors};

/// Student list rules
pub const LIST_META: ListMeta = ListMeta {
    invalid_code: "training_student_list_001",
    search_fields: &[
        SearchField {
            name: "id",
            kind: FieldKind::Integer,
        },
        SearchField {
            name: "cls_id",
            kind: FieldKind::Integer,
        },
        SearchField {
            name: "cls__trainer",
            kind: FieldKind::Text,
        },
        SearchField {
            name: "notes",
            kind: FieldKind::Text,
        },
        SearchField {
            name: "user_id",
            kind: FieldKind::Integer,
        },
        SearchField {
            name: "cls__syllabus__name",
            kind: FieldKind::Text,
        },
    ],
    allowed_ordering: &[
        "id",
        "cls_id",
        "cls__trainer",
        "created",
        "user_id",
        "cls__syllabus__name",
        "cls__start_date",
        "cls__finish_date",
    ],
};

/// Values accepted so far
#[derive(Debug, Default)]
pub struct CleanedStudent {
    pub cls: Option<Cls>,
    pub user_id: Option<i64>,
    pub notes: Option<String>,
}

impl CleanedStudent {
    /// Build the insert for a fully validated create
    pub fn into_new(self) -> ApiResult<NewStudent> {
        let missing = |field: &str| ApiError::Internal(format!("validated student has no {}", field));

        Ok(NewStudent {
            cls: self.cls.ok_or_else(|| missing("cls"))?,
            user_id: self.user_id.ok_or_else(|| missing("user_id"))?,
            notes: self.notes.unwrap_or_default(),
        })
    }

    /// Copy accepted values onto an existing record
    pub fn apply(self, student: &mut Student) {
        if let Some(cls) = self.cls {
            student.cls = cls;
        }
        if let Some(user_id) = self.user_id {
            student.user_id = user_id;
        }
        if let Some(notes) = self.notes {
            student.notes = notes;
        }
    }
}

/// Validates Student bodies
pub struct StudentController<'a> {
    db: &'a SqlitePool,
    directory: &'a dyn Directory,
    caller: &'a Caller,
    mutation: Mutation,
    pub cleaned: CleanedStudent,
}

impl<'a> StudentController<'a> {
    pub fn create(db: &'a SqlitePool, directory: &'a dyn Directory, caller: &'a Caller) -> Self {
        Self::new(db, directory, caller, Mutation::Create)
    }

    pub fn update(db: &'a SqlitePool, directory: &'a dyn Directory, caller: &'a Caller) -> Self {
        Self::new(db, directory, caller, Mutation::Update)
    }

    fn new(
        db: &'a SqlitePool,
        directory: &'a dyn Directory,
        caller: &'a Caller,
        mutation: Mutation,
    ) -> Self {
        Self {
            db,
            directory,
            caller,
            mutation,
            cleaned: CleanedStudent::default(),
        }
    }

    fn code(&self, create: &'static str, update: &'static str) -> Option<&'static str> {
        Some(self.mutation.code(create, update))
    }

    async fn validate_cls_id(&mut self, value: Option<&Value>) -> FieldOutcome {
        let Some(cls_id) = positive_id(value) else {
            return Ok(self.code("training_student_create_101", "training_student_update_101"));
        };

        match db::cls::get_live(self.db, cls_id).await? {
            Some(cls) => {
                self.cleaned.cls = Some(cls);
                Ok(None)
            }
            None => Ok(self.code("training_student_create_102", "training_student_update_102")),
        }
    }

    async fn validate_user_id(&mut self, value: Option<&Value>) -> FieldOutcome {
        let Some(user_id) = positive_id(value) else {
            return Ok(self.code("training_student_create_103", "training_student_update_103"));
        };

        let readable = match self.directory.user_exists(&self.caller.token, user_id).await {
            Ok(readable) => readable,
            Err(e) => {
                warn!(user_id, "User lookup failed: {}", e);
                false
            }
        };

        if !readable {
            return Ok(self.code("training_student_create_104", "training_student_update_104"));
        }

        self.cleaned.user_id = Some(user_id);
        Ok(None)
    }

    fn validate_notes(&mut self, value: Option<&Value>) -> FieldOutcome {
        self.cleaned.notes = Some(optional_text(value));
        Ok(None)
    }
}

#[async_trait]
impl<'a> Controller for StudentController<'a> {
    const VALIDATION_ORDER: &'static [&'static str] = &["cls_id", "user_id", "notes"];

    async fn validate_field(
        &mut self,
        field: &'static str,
        value: Option<&Value>,
        _errors: &FieldErrors,
    ) -> FieldOutcome {
        match field {
            "cls_id" => self.validate_cls_id(value).await,
            "user_id" => self.validate_user_id(value).await,
            "notes" => self.validate_notes(value),
            _ => Ok(None),
        }
    }
}
