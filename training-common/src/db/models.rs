//! Database models
//!
//! Each model carries its parent eagerly loaded (a Class holds its Syllabus,
//! a Student holds its Class), so tenant resolution and presentation never
//! need a second query.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of `Syllabus::name`
pub const SYLLABUS_NAME_MAX_LENGTH: usize = 50;

/// Maximum length of `Cls::trainer`
pub const CLS_TRAINER_MAX_LENGTH: usize = 50;

/// Owning Member of a record, resolved through its parent chain
pub trait TenantScoped {
    fn resolve_tenant(&self) -> i64;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Syllabus {
    pub id: i64,
    pub member_id: i64,
    pub name: String,
    pub description: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub deleted: Option<DateTime<Utc>>,
}

/// A Class record. Named `Cls` because `class` is reserved in most clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cls {
    pub id: i64,
    pub start_date: NaiveDate,
    pub finish_date: Option<NaiveDate>,
    pub trainer: String,
    pub syllabus: Syllabus,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub deleted: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub cls: Cls,
    pub user_id: i64,
    pub notes: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub deleted: Option<DateTime<Utc>>,
}

/// Insert payload for a Syllabus
#[derive(Debug, Clone)]
pub struct NewSyllabus {
    pub member_id: i64,
    pub name: String,
    pub description: String,
}

/// Insert payload for a Class
#[derive(Debug, Clone)]
pub struct NewCls {
    pub start_date: NaiveDate,
    pub finish_date: Option<NaiveDate>,
    pub trainer: String,
    pub syllabus: Syllabus,
}

/// Insert payload for a Student
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub cls: Cls,
    pub user_id: i64,
    pub notes: String,
}

impl TenantScoped for Syllabus {
    fn resolve_tenant(&self) -> i64 {
        self.member_id
    }
}

impl TenantScoped for Cls {
    fn resolve_tenant(&self) -> i64 {
        self.syllabus.resolve_tenant()
    }
}

impl TenantScoped for Student {
    fn resolve_tenant(&self) -> i64 {
        self.cls.resolve_tenant()
    }
}

impl TenantScoped for NewCls {
    fn resolve_tenant(&self) -> i64 {
        self.syllabus.resolve_tenant()
    }
}

impl TenantScoped for NewStudent {
    fn resolve_tenant(&self) -> i64 {
        self.cls.resolve_tenant()
    }
}
