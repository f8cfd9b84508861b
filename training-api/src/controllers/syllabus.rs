//! Syllabus create/update validation

use async_trait::async_trait;
use serde_json::Value;
use sqlx::SqlitePool;
use training_common::db::{NewSyllabus, Syllabus, SYLLABUS_NAME_MAX_LENGTH};

use super::fields::{optional_text, required_text, TextError};
use super::list::{FieldKind, ListMeta, SearchField};
use super::{Controller, FieldOutcome, Mutation};
use crate::db;
use crate::error::{ApiError, ApiResult, FieldErrors};

/// Syllabus list rules
pub const LIST_META: ListMeta = ListMeta {
    invalid_code: "training_syllabus_list_001",
    search_fields: &[
        SearchField {
            name: "id",
            kind: FieldKind::Integer,
        },
        SearchField {
            name: "name",
            kind: FieldKind::Text,
        },
    ],
    allowed_ordering: &["id", "created", "name"],
};

/// Values accepted so far
#[derive(Debug, Default)]
pub struct CleanedSyllabus {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CleanedSyllabus {
    /// Build the insert for a fully validated create
    pub fn into_new(self, member_id: i64) -> ApiResult<NewSyllabus> {
        let name = self
            .name
            .ok_or_else(|| ApiError::Internal("validated syllabus has no name".to_string()))?;

        Ok(NewSyllabus {
            member_id,
            name,
            description: self.description.unwrap_or_default(),
        })
    }

    /// Copy accepted values onto an existing record
    pub fn apply(self, syllabus: &mut Syllabus) {
        if let Some(name) = self.name {
            syllabus.name = name;
        }
        if let Some(description) = self.description {
            syllabus.description = description;
        }
    }
}

/// Validates Syllabus bodies
///
/// Names are unique among the caller's live Syllabuses.
pub struct SyllabusController<'a> {
    db: &'a SqlitePool,
    member_id: i64,
    mutation: Mutation,
    /// Record being updated, left out of the uniqueness check
    instance_id: Option<i64>,
    pub cleaned: CleanedSyllabus,
}

impl<'a> SyllabusController<'a> {
    pub fn create(db: &'a SqlitePool, member_id: i64) -> Self {
        Self {
            db,
            member_id,
            mutation: Mutation::Create,
            instance_id: None,
            cleaned: CleanedSyllabus::default(),
        }
    }

    pub fn update(db: &'a SqlitePool, member_id: i64, instance: &Syllabus) -> Self {
        Self {
            db,
            member_id,
            mutation: Mutation::Update,
            instance_id: Some(instance.id),
            cleaned: CleanedSyllabus::default(),
        }
    }

    fn validate_description(&mut self, value: Option<&Value>) -> FieldOutcome {
        self.cleaned.description = Some(optional_text(value));
        Ok(None)
    }

    async fn validate_name(&mut self, value: Option<&Value>) -> FieldOutcome {
        let name = match required_text(value, SYLLABUS_NAME_MAX_LENGTH) {
            Ok(name) => name,
            Err(TextError::Missing) => {
                return Ok(Some(self.mutation.code(
                    "training_syllabus_create_101",
                    "training_syllabus_update_101",
                )))
            }
            Err(TextError::TooLong) => {
                return Ok(Some(self.mutation.code(
                    "training_syllabus_create_102",
                    "training_syllabus_update_102",
                )))
            }
        };

        if db::syllabus::name_taken(self.db, self.member_id, &name, self.instance_id).await? {
            return Ok(Some(self.mutation.code(
                "training_syllabus_create_103",
                "training_syllabus_update_103",
            )));
        }

        self.cleaned.name = Some(name);
        Ok(None)
    }
}

#[async_trait]
impl<'a> Controller for SyllabusController<'a> {
    const VALIDATION_ORDER: &'static [&'static str] = &["description", "name"];

    async fn validate_field(
        &mut self,
        field: &'static str,
        value: Option<&Value>,
        _errors: &FieldErrors,
    ) -> FieldOutcome {
        match field {
            "description" => self.validate_description(value),
            "name" => self.validate_name(value).await,
            _ => Ok(None),
        }
    }
}
