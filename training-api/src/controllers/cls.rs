//! Class create/update validation
//!
//! `finish_date` depends on `start_date`. On create, the comparison is
//! skipped when `start_date` was rejected. On update, an absent
//! `start_date` falls back to the stored one.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use sqlx::SqlitePool;
use training_common::db::{Cls, NewCls, Syllabus, CLS_TRAINER_MAX_LENGTH};

use super::fields::{date, positive_id, required_text, TextError};
use super::list::{FieldKind, ListMeta, SearchField};
use super::{Controller, FieldOutcome, Mutation};
use crate::db;
use crate::error::{ApiError, ApiResult, FieldErrors};

/// Class list rules
pub const LIST_META: ListMeta = ListMeta {
    invalid_code: "training_cls_list_001",
    search_fields: &[
        SearchField {
            name: "id",
            kind: FieldKind::Integer,
        },
        SearchField {
            name: "finish_date",
            kind: FieldKind::Date,
        },
        SearchField {
            name: "start_date",
            kind: FieldKind::Date,
        },
        SearchField {
            name: "syllabus_id",
            kind: FieldKind::Integer,
        },
        SearchField {
            name: "syllabus__name",
            kind: FieldKind::Text,
        },
        SearchField {
            name: "trainer",
            kind: FieldKind::Text,
        },
    ],
    allowed_ordering: &[
        "id",
        "created",
        "finish_date",
        "start_date",
        "syllabus__name",
        "trainer",
    ],
};

/// Values accepted so far
#[derive(Debug, Default)]
pub struct CleanedCls {
    pub start_date: Option<NaiveDate>,
    /// Outer `None`: not accepted. `Some(None)`: clear the finish date.
    pub finish_date: Option<Option<NaiveDate>>,
    pub syllabus: Option<Syllabus>,
    pub trainer: Option<String>,
}

impl CleanedCls {
    /// Build the insert for a fully validated create
    pub fn into_new(self) -> ApiResult<NewCls> {
        let missing = |field: &str| ApiError::Internal(format!("validated class has no {}", field));

        Ok(NewCls {
            start_date: self.start_date.ok_or_else(|| missing("start_date"))?,
            finish_date: self.finish_date.flatten(),
            trainer: self.trainer.ok_or_else(|| missing("trainer"))?,
            syllabus: self.syllabus.ok_or_else(|| missing("syllabus"))?,
        })
    }

    /// Copy accepted values onto an existing record
    pub fn apply(self, cls: &mut Cls) {
        if let Some(start_date) = self.start_date {
            cls.start_date = start_date;
        }
        if let Some(finish_date) = self.finish_date {
            cls.finish_date = finish_date;
        }
        if let Some(syllabus) = self.syllabus {
            cls.syllabus = syllabus;
        }
        if let Some(trainer) = self.trainer {
            cls.trainer = trainer;
        }
    }
}

/// Validates Class bodies
pub struct ClsController<'a> {
    db: &'a SqlitePool,
    mutation: Mutation,
    /// Stored dates of the record being updated
    instance_dates: Option<(NaiveDate, Option<NaiveDate>)>,
    pub cleaned: CleanedCls,
}

impl<'a> ClsController<'a> {
    pub fn create(db: &'a SqlitePool) -> Self {
        Self {
            db,
            mutation: Mutation::Create,
            instance_dates: None,
            cleaned: CleanedCls::default(),
        }
    }

    pub fn update(db: &'a SqlitePool, instance: &Cls) -> Self {
        Self {
            db,
            mutation: Mutation::Update,
            instance_dates: Some((instance.start_date, instance.finish_date)),
            cleaned: CleanedCls::default(),
        }
    }

    fn code(&self, create: &'static str, update: &'static str) -> Option<&'static str> {
        Some(self.mutation.code(create, update))
    }

    fn validate_start_date(&mut self, value: Option<&Value>) -> FieldOutcome {
        match date(value) {
            Some(start_date) => {
                self.cleaned.start_date = Some(start_date);
                Ok(None)
            }
            None => Ok(self.code("training_cls_create_101", "training_cls_update_101")),
        }
    }

    fn validate_finish_date(&mut self, value: Option<&Value>, errors: &FieldErrors) -> FieldOutcome {
        let absent = value.map_or(true, Value::is_null);

        let start_date = match self.mutation {
            Mutation::Create => {
                if absent {
                    return Ok(None);
                }
                let Some(finish_date) = date(value) else {
                    return Ok(self.code("training_cls_create_102", "training_cls_update_102"));
                };
                let Some(start_date) = self.cleaned.start_date else {
                    return Ok(None);
                };
                return Ok(self.accept_finish(start_date, finish_date));
            }
            Mutation::Update => match (self.cleaned.start_date, self.instance_dates) {
                (Some(start_date), _) => start_date,
                (None, _) if errors.contains_key("start_date") => return Ok(None),
                (None, Some((stored_start, _))) => stored_start,
                (None, None) => return Ok(None),
            },
        };

        if absent {
            self.cleaned.finish_date = Some(None);
            return Ok(None);
        }
        let Some(finish_date) = date(value) else {
            return Ok(self.code("training_cls_create_102", "training_cls_update_102"));
        };
        Ok(self.accept_finish(start_date, finish_date))
    }

    fn accept_finish(&mut self, start_date: NaiveDate, finish_date: NaiveDate) -> Option<&'static str> {
        if finish_date < start_date {
            return self.code("training_cls_create_103", "training_cls_update_103");
        }
        self.cleaned.finish_date = Some(Some(finish_date));
        None
    }

    async fn validate_syllabus_id(&mut self, value: Option<&Value>) -> FieldOutcome {
        let Some(syllabus_id) = positive_id(value) else {
            return Ok(self.code("training_cls_create_104", "training_cls_update_104"));
        };

        match db::syllabus::get_live(self.db, syllabus_id).await? {
            Some(syllabus) => {
                self.cleaned.syllabus = Some(syllabus);
                Ok(None)
            }
            None => Ok(self.code("training_cls_create_105", "training_cls_update_105")),
        }
    }

    fn validate_trainer(&mut self, value: Option<&Value>) -> FieldOutcome {
        match required_text(value, CLS_TRAINER_MAX_LENGTH) {
            Ok(trainer) => {
                self.cleaned.trainer = Some(trainer);
                Ok(None)
            }
            Err(TextError::Missing) => {
                Ok(self.code("training_cls_create_106", "training_cls_update_106"))
            }
            Err(TextError::TooLong) => {
                Ok(self.code("training_cls_create_107", "training_cls_update_107"))
            }
        }
    }
}

#[async_trait]
impl<'a> Controller for ClsController<'a> {
    const VALIDATION_ORDER: &'static [&'static str] =
        &["start_date", "finish_date", "syllabus_id", "trainer"];

    async fn validate_field(
        &mut self,
        field: &'static str,
        value: Option<&Value>,
        errors: &FieldErrors,
    ) -> FieldOutcome {
        match field {
            "start_date" => self.validate_start_date(value),
            "finish_date" => self.validate_finish_date(value, errors),
            "syllabus_id" => self.validate_syllabus_id(value).await,
            "trainer" => self.validate_trainer(value),
            _ => Ok(None),
        }
    }

    /// A new start date must not pass the stored finish date
    fn finish(&mut self, errors: &mut FieldErrors) {
        if self.mutation != Mutation::Update
            || self.cleaned.finish_date.is_some()
            || errors.contains_key("finish_date")
        {
            return;
        }

        if let (Some(start_date), Some((_, Some(stored_finish)))) =
            (self.cleaned.start_date, self.instance_dates)
        {
            if stored_finish < start_date {
                errors.insert("finish_date", "training_cls_update_103");
            }
        }
    }
}
