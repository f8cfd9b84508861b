//! Student persistence

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use training_common::db::{NewStudent, Student};
use training_common::Result;

use super::cls::cls_from_row;
use super::query::{fetch_page, ListSource};
use crate::controllers::ListQuery;

pub(crate) const SELECT: &str = concat!(
    "SELECT ",
    student_columns!(),
    ", ",
    cls_columns!(),
    ", ",
    syllabus_columns!(),
    " FROM student st JOIN cls c ON c.id = st.cls_id JOIN syllabus sy ON sy.id = c.syllabus_id"
);

/// Student list mapping
pub const LIST_SOURCE: ListSource = ListSource {
    select: concat!(student_columns!(), ", ", cls_columns!(), ", ", syllabus_columns!()),
    from: "student st JOIN cls c ON c.id = st.cls_id JOIN syllabus sy ON sy.id = c.syllabus_id",
    tenant_column: "sy.member_id",
    deleted_column: "st.deleted",
    id_column: "st.id",
    columns: &[
        ("id", "st.id"),
        ("created", "st.created"),
        ("cls_id", "st.cls_id"),
        ("cls__trainer", "c.trainer"),
        ("cls__start_date", "c.start_date"),
        ("cls__finish_date", "c.finish_date"),
        ("cls__syllabus__name", "sy.name"),
        ("notes", "st.notes"),
        ("user_id", "st.user_id"),
    ],
};

/// Map the `st_`, `c_` and `sy_` columns of a row
pub(crate) fn student_from_row(row: &SqliteRow) -> std::result::Result<Student, sqlx::Error> {
    Ok(Student {
        id: row.try_get("st_id")?,
        cls: cls_from_row(row)?,
        user_id: row.try_get("st_user_id")?,
        notes: row.try_get("st_notes")?,
        created: row.try_get("st_created")?,
        updated: row.try_get("st_updated")?,
        deleted: row.try_get("st_deleted")?,
    })
}

/// Load a live Student by id
pub async fn get_live(pool: &SqlitePool, id: i64) -> Result<Option<Student>> {
    let sql = format!("{} WHERE st.id = ? AND st.deleted IS NULL", SELECT);
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;

    Ok(row.as_ref().map(student_from_row).transpose()?)
}

/// Insert a new Student
pub async fn insert(pool: &SqlitePool, new: &NewStudent) -> Result<Student> {
    let now = Utc::now();

    let result = sqlx::query(
        "INSERT INTO student (cls_id, user_id, notes, created, updated)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(new.cls.id)
    .bind(new.user_id)
    .bind(&new.notes)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Student {
        id: result.last_insert_rowid(),
        cls: new.cls.clone(),
        user_id: new.user_id,
        notes: new.notes.clone(),
        created: now,
        updated: now,
        deleted: None,
    })
}

/// Persist changed fields (including a new Class) and stamp `updated`
pub async fn save(pool: &SqlitePool, student: &mut Student) -> Result<()> {
    student.updated = Utc::now();

    sqlx::query("UPDATE student SET cls_id = ?, user_id = ?, notes = ?, updated = ? WHERE id = ?")
        .bind(student.cls.id)
        .bind(student.user_id)
        .bind(&student.notes)
        .bind(student.updated)
        .bind(student.id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Soft delete a Student
pub async fn soft_delete(pool: &SqlitePool, student: &mut Student) -> Result<()> {
    let now = Utc::now();

    sqlx::query("UPDATE student SET deleted = ? WHERE id = ?")
        .bind(now)
        .bind(student.id)
        .execute(pool)
        .await?;

    student.deleted = Some(now);
    Ok(())
}

/// One page of a Member's live Students
pub async fn list(
    pool: &SqlitePool,
    member_id: i64,
    query: &ListQuery,
) -> Result<(Vec<Student>, i64)> {
    fetch_page(pool, &LIST_SOURCE, member_id, query, student_from_row).await
}
