//! Response presenters
//!
//! Wire shapes for each resource. Parents are nested in full, dates are
//! `YYYY-MM-DD`, and every record carries the `uri` of its item route.
//! Timestamps and soft-delete state are never exposed.

use chrono::NaiveDate;
use serde::Serialize;
use training_common::db::{Cls, Student, Syllabus};

pub fn syllabus_uri(id: i64) -> String {
    format!("/syllabus/{}/", id)
}

pub fn cls_uri(id: i64) -> String {
    format!("/class/{}/", id)
}

pub fn student_uri(id: i64) -> String {
    format!("/student/{}/", id)
}

#[derive(Debug, Clone, Serialize)]
pub struct SyllabusOut {
    pub description: String,
    pub id: i64,
    pub member_id: i64,
    pub name: String,
    pub uri: String,
}

impl From<&Syllabus> for SyllabusOut {
    fn from(syllabus: &Syllabus) -> Self {
        Self {
            description: syllabus.description.clone(),
            id: syllabus.id,
            member_id: syllabus.member_id,
            name: syllabus.name.clone(),
            uri: syllabus_uri(syllabus.id),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClsOut {
    pub finish_date: Option<NaiveDate>,
    pub id: i64,
    pub start_date: NaiveDate,
    pub syllabus: SyllabusOut,
    pub trainer: String,
    pub uri: String,
}

impl From<&Cls> for ClsOut {
    fn from(cls: &Cls) -> Self {
        Self {
            finish_date: cls.finish_date,
            id: cls.id,
            start_date: cls.start_date,
            syllabus: SyllabusOut::from(&cls.syllabus),
            trainer: cls.trainer.clone(),
            uri: cls_uri(cls.id),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentOut {
    pub cls: ClsOut,
    pub id: i64,
    pub notes: String,
    pub uri: String,
    pub user_id: i64,
}

impl From<&Student> for StudentOut {
    fn from(student: &Student) -> Self {
        Self {
            cls: ClsOut::from(&student.cls),
            id: student.id,
            notes: student.notes.clone(),
            uri: student_uri(student.id),
            user_id: student.user_id,
        }
    }
}
