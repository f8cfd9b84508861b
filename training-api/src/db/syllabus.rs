//! Syllabus persistence

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;
use training_common::db::{NewSyllabus, Syllabus};
use training_common::Result;

use super::query::{fetch_page, ListSource};
use crate::controllers::ListQuery;

pub(crate) const SELECT: &str = concat!("SELECT ", syllabus_columns!(), " FROM syllabus sy");

/// Syllabus list mapping
pub const LIST_SOURCE: ListSource = ListSource {
    select: syllabus_columns!(),
    from: "syllabus sy",
    tenant_column: "sy.member_id",
    deleted_column: "sy.deleted",
    id_column: "sy.id",
    columns: &[
        ("id", "sy.id"),
        ("name", "sy.name"),
        ("created", "sy.created"),
    ],
};

/// Map the `sy_` columns of a row
pub(crate) fn syllabus_from_row(row: &SqliteRow) -> std::result::Result<Syllabus, sqlx::Error> {
    Ok(Syllabus {
        id: row.try_get("sy_id")?,
        member_id: row.try_get("sy_member_id")?,
        name: row.try_get("sy_name")?,
        description: row.try_get("sy_description")?,
        created: row.try_get("sy_created")?,
        updated: row.try_get("sy_updated")?,
        deleted: row.try_get("sy_deleted")?,
    })
}

/// Load a live Syllabus by id
pub async fn get_live(pool: &SqlitePool, id: i64) -> Result<Option<Syllabus>> {
    let sql = format!("{} WHERE sy.id = ? AND sy.deleted IS NULL", SELECT);
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;

    Ok(row.as_ref().map(syllabus_from_row).transpose()?)
}

/// Insert a new Syllabus
pub async fn insert(pool: &SqlitePool, new: &NewSyllabus) -> Result<Syllabus> {
    let now = Utc::now();

    let result = sqlx::query(
        "INSERT INTO syllabus (member_id, name, description, created, updated)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(new.member_id)
    .bind(&new.name)
    .bind(&new.description)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Syllabus {
        id: result.last_insert_rowid(),
        member_id: new.member_id,
        name: new.name.clone(),
        description: new.description.clone(),
        created: now,
        updated: now,
        deleted: None,
    })
}

/// Persist changed fields and stamp `updated`
pub async fn save(pool: &SqlitePool, syllabus: &mut Syllabus) -> Result<()> {
    syllabus.updated = Utc::now();

    sqlx::query("UPDATE syllabus SET name = ?, description = ?, updated = ? WHERE id = ?")
        .bind(&syllabus.name)
        .bind(&syllabus.description)
        .bind(syllabus.updated)
        .bind(syllabus.id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Whether a live Syllabus of `member_id` already uses `name`
///
/// `exclude_id` leaves the record being updated out of the check.
pub async fn name_taken(
    pool: &SqlitePool,
    member_id: i64,
    name: &str,
    exclude_id: Option<i64>,
) -> Result<bool> {
    let taken: i64 = sqlx::query_scalar(
        "SELECT EXISTS(
             SELECT 1 FROM syllabus
             WHERE member_id = ? AND name = ? AND deleted IS NULL
               AND (? IS NULL OR id != ?)
         )",
    )
    .bind(member_id)
    .bind(name)
    .bind(exclude_id)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;

    Ok(taken != 0)
}

/// Whether any live Student sits in a Class of this Syllabus
pub async fn has_live_students(pool: &SqlitePool, syllabus_id: i64) -> Result<bool> {
    let found: i64 = sqlx::query_scalar(
        "SELECT EXISTS(
             SELECT 1 FROM student st
             JOIN cls c ON c.id = st.cls_id
             WHERE c.syllabus_id = ? AND st.deleted IS NULL
         )",
    )
    .bind(syllabus_id)
    .fetch_one(pool)
    .await?;

    Ok(found != 0)
}

/// Soft delete a Syllabus and its live Classes in one transaction
///
/// Students of those Classes are not touched.
pub async fn cascade_delete(pool: &SqlitePool, syllabus: &mut Syllabus) -> Result<u64> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE syllabus SET deleted = ? WHERE id = ?")
        .bind(now)
        .bind(syllabus.id)
        .execute(&mut *tx)
        .await?;

    let classes = sqlx::query("UPDATE cls SET deleted = ? WHERE syllabus_id = ? AND deleted IS NULL")
        .bind(now)
        .bind(syllabus.id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    syllabus.deleted = Some(now);
    debug!(syllabus_id = syllabus.id, classes, "Cascaded soft delete");
    Ok(classes)
}

/// One page of a Member's live Syllabuses
pub async fn list(
    pool: &SqlitePool,
    member_id: i64,
    query: &ListQuery,
) -> Result<(Vec<Syllabus>, i64)> {
    fetch_page(pool, &LIST_SOURCE, member_id, query, syllabus_from_row).await
}
