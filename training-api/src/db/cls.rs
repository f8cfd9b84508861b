//! Class persistence
//!
//! The table is `cls` because `class` is reserved in most client languages.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use training_common::db::{Cls, NewCls};
use training_common::Result;

use super::query::{fetch_page, ListSource};
use super::syllabus::syllabus_from_row;
use crate::controllers::ListQuery;

const FROM: &str = "cls c JOIN syllabus sy ON sy.id = c.syllabus_id";

pub(crate) const SELECT: &str = concat!(
    "SELECT ",
    cls_columns!(),
    ", ",
    syllabus_columns!(),
    " FROM cls c JOIN syllabus sy ON sy.id = c.syllabus_id"
);

/// Class list mapping
pub const LIST_SOURCE: ListSource = ListSource {
    select: concat!(cls_columns!(), ", ", syllabus_columns!()),
    from: FROM,
    tenant_column: "sy.member_id",
    deleted_column: "c.deleted",
    id_column: "c.id",
    columns: &[
        ("id", "c.id"),
        ("created", "c.created"),
        ("finish_date", "c.finish_date"),
        ("start_date", "c.start_date"),
        ("syllabus_id", "c.syllabus_id"),
        ("syllabus__name", "sy.name"),
        ("trainer", "c.trainer"),
    ],
};

/// Map the `c_` and `sy_` columns of a row
pub(crate) fn cls_from_row(row: &SqliteRow) -> std::result::Result<Cls, sqlx::Error> {
    Ok(Cls {
        id: row.try_get("c_id")?,
        start_date: row.try_get("c_start_date")?,
        finish_date: row.try_get("c_finish_date")?,
        trainer: row.try_get("c_trainer")?,
        syllabus: syllabus_from_row(row)?,
        created: row.try_get("c_created")?,
        updated: row.try_get("c_updated")?,
        deleted: row.try_get("c_deleted")?,
    })
}

/// Load a live Class by id
pub async fn get_live(pool: &SqlitePool, id: i64) -> Result<Option<Cls>> {
    let sql = format!("{} WHERE c.id = ? AND c.deleted IS NULL", SELECT);
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;

    Ok(row.as_ref().map(cls_from_row).transpose()?)
}

/// Insert a new Class
pub async fn insert(pool: &SqlitePool, new: &NewCls) -> Result<Cls> {
    let now = Utc::now();

    let result = sqlx::query(
        "INSERT INTO cls (start_date, finish_date, trainer, syllabus_id, created, updated)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(new.start_date)
    .bind(new.finish_date)
    .bind(&new.trainer)
    .bind(new.syllabus.id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Cls {
        id: result.last_insert_rowid(),
        start_date: new.start_date,
        finish_date: new.finish_date,
        trainer: new.trainer.clone(),
        syllabus: new.syllabus.clone(),
        created: now,
        updated: now,
        deleted: None,
    })
}

/// Persist changed fields (including a new Syllabus) and stamp `updated`
pub async fn save(pool: &SqlitePool, cls: &mut Cls) -> Result<()> {
    cls.updated = Utc::now();

    sqlx::query(
        "UPDATE cls
         SET start_date = ?, finish_date = ?, trainer = ?, syllabus_id = ?, updated = ?
         WHERE id = ?",
    )
    .bind(cls.start_date)
    .bind(cls.finish_date)
    .bind(&cls.trainer)
    .bind(cls.syllabus.id)
    .bind(cls.updated)
    .bind(cls.id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Whether the Class has any live Student
pub async fn has_live_students(pool: &SqlitePool, cls_id: i64) -> Result<bool> {
    let found: i64 = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM student WHERE cls_id = ? AND deleted IS NULL)",
    )
    .bind(cls_id)
    .fetch_one(pool)
    .await?;

    Ok(found != 0)
}

/// Soft delete a Class
pub async fn soft_delete(pool: &SqlitePool, cls: &mut Cls) -> Result<()> {
    let now = Utc::now();

    sqlx::query("UPDATE cls SET deleted = ? WHERE id = ?")
        .bind(now)
        .bind(cls.id)
        .execute(pool)
        .await?;

    cls.deleted = Some(now);
    Ok(())
}

/// One page of a Member's live Classes
pub async fn list(pool: &SqlitePool, member_id: i64, query: &ListQuery) -> Result<(Vec<Cls>, i64)> {
    fetch_page(pool, &LIST_SOURCE, member_id, query, cls_from_row).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::syllabus;
    use chrono::NaiveDate;
    use training_common::db::{init_memory_database, NewSyllabus};

    #[tokio::test]
    async fn test_round_trip_with_parent() {
        let pool = init_memory_database().await.unwrap();
        let parent = syllabus::insert(
            &pool,
            &NewSyllabus {
                member_id: 4,
                name: "First Aid".to_string(),
                description: String::new(),
            },
        )
        .await
        .unwrap();

        let created = insert(
            &pool,
            &NewCls {
                start_date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
                finish_date: None,
                trainer: "Grace".to_string(),
                syllabus: parent.clone(),
            },
        )
        .await
        .unwrap();

        let loaded = get_live(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(loaded.syllabus, parent);
        assert_eq!(loaded.start_date, NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());
        assert!(loaded.finish_date.is_none());
        assert!(!has_live_students(&pool, created.id).await.unwrap());

        let mut loaded = loaded;
        soft_delete(&pool, &mut loaded).await.unwrap();
        assert!(get_live(&pool, created.id).await.unwrap().is_none());
    }
}
