//! Filtered, ordered, paginated list queries
//!
//! Column expressions never come from the request. Filters and orderings
//! name fields; each resource maps its fields to SQL through a
//! [`ListSource`], and every value is bound as a parameter.

use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool};
use tracing::debug;
use training_common::{Error, Result};

use crate::controllers::list::{Filter, FilterValue, ListQuery, Operator};
use crate::pagination::calculate_pagination;

/// Value bound to a `?` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Int(i64),
    Text(String),
}

/// How one resource is listed
#[derive(Debug)]
pub struct ListSource {
    /// Aliased select list understood by the resource's row mapper
    pub select: &'static str,
    /// Table expression, including joins to parents
    pub from: &'static str,
    /// Column holding the owning Member id
    pub tenant_column: &'static str,
    /// Soft-delete column of the listed table
    pub deleted_column: &'static str,
    /// Primary key, the final tie-breaker of every ordering
    pub id_column: &'static str,
    /// Field name → SQL column expression
    pub columns: &'static [(&'static str, &'static str)],
}

impl ListSource {
    pub fn column(&self, field: &str) -> Option<&'static str> {
        self.columns
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
    }

    fn require_column(&self, field: &str) -> Result<&'static str> {
        self.column(field).ok_or_else(|| {
            Error::Internal(format!("No column mapped for list field '{}' on {}", field, self.from))
        })
    }
}

/// SQL fragment plus the values for its placeholders
#[derive(Debug, Default)]
struct WhereClause {
    sql: String,
    binds: Vec<BindValue>,
}

fn build_where(source: &ListSource, member_id: i64, filters: &[Filter]) -> Result<WhereClause> {
    let mut clause = WhereClause {
        sql: format!(
            " WHERE {} IS NULL AND {} = ?",
            source.deleted_column, source.tenant_column
        ),
        binds: vec![BindValue::Int(member_id)],
    };

    for filter in filters {
        let column = source.require_column(filter.field)?;
        clause.sql.push_str(" AND ");
        if filter.negate {
            // A NULL condition counts as "not matched", so it is kept by exclude
            clause.sql.push_str("NOT COALESCE((");
            push_condition(&mut clause, column, filter);
            clause.sql.push_str("), 0)");
        } else {
            push_condition(&mut clause, column, filter);
        }
    }

    Ok(clause)
}

fn push_condition(clause: &mut WhereClause, column: &str, filter: &Filter) {
    let sql = &mut clause.sql;
    let binds = &mut clause.binds;

    match (&filter.operator, &filter.value) {
        (Operator::IsNull, FilterValue::Null(true)) => sql.push_str(&format!("{} IS NULL", column)),
        (Operator::IsNull, _) => sql.push_str(&format!("{} IS NOT NULL", column)),
        (Operator::In, FilterValue::Many(values)) => {
            if values.is_empty() {
                sql.push('0');
            } else {
                let placeholders = vec!["?"; values.len()].join(", ");
                sql.push_str(&format!("{} IN ({})", column, placeholders));
                binds.extend(values.iter().cloned());
            }
        }
        (Operator::Range, FilterValue::Range(low, high)) => {
            sql.push_str(&format!("{} BETWEEN ? AND ?", column));
            binds.push(low.clone());
            binds.push(high.clone());
        }
        (operator, FilterValue::One(value)) => {
            let (template, placeholders) = single_value_template(*operator);
            sql.push_str(&template.replace("{col}", column));
            for _ in 0..placeholders {
                binds.push(value.clone());
            }
        }
        // Shapes are fixed by the list controller; anything else matches nothing
        _ => sql.push('0'),
    }
}

/// SQL template and placeholder count for single-valued operators
fn single_value_template(operator: Operator) -> (&'static str, usize) {
    match operator {
        Operator::Exact => ("{col} = ?", 1),
        Operator::IExact => ("LOWER({col}) = LOWER(?)", 1),
        Operator::Contains => ("instr({col}, ?) > 0", 1),
        Operator::IContains => ("instr(LOWER({col}), LOWER(?)) > 0", 1),
        Operator::StartsWith => ("substr({col}, 1, length(?)) = ?", 2),
        Operator::IStartsWith => ("LOWER(substr({col}, 1, length(?))) = LOWER(?)", 2),
        Operator::EndsWith => ("(length(?) = 0 OR substr({col}, -length(?)) = ?)", 3),
        Operator::IEndsWith => (
            "(length(?) = 0 OR LOWER(substr({col}, -length(?))) = LOWER(?))",
            3,
        ),
        Operator::Gt => ("{col} > ?", 1),
        Operator::Gte => ("{col} >= ?", 1),
        Operator::Lt => ("{col} < ?", 1),
        Operator::Lte => ("{col} <= ?", 1),
        Operator::In | Operator::Range | Operator::IsNull => ("0", 0),
    }
}

fn bind_all<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    binds: &'q [BindValue],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for value in binds {
        query = match value {
            BindValue::Int(v) => query.bind(*v),
            BindValue::Text(v) => query.bind(v.as_str()),
        };
    }
    query
}

/// Fetch one page of a tenant's live records plus the total match count
pub async fn fetch_page<T>(
    pool: &SqlitePool,
    source: &ListSource,
    member_id: i64,
    query: &ListQuery,
    map_row: fn(&SqliteRow) -> std::result::Result<T, sqlx::Error>,
) -> Result<(Vec<T>, i64)> {
    let clause = build_where(source, member_id, &query.filters)?;
    let order_column = source.require_column(query.order.field)?;
    let direction = if query.order.descending { "DESC" } else { "ASC" };
    let window = calculate_pagination(query.page, query.limit);

    let count_sql = format!("SELECT COUNT(*) FROM {}{}", source.from, clause.sql);
    let total: i64 = bind_all(sqlx::query(&count_sql), &clause.binds)
        .fetch_one(pool)
        .await?
        .try_get(0)?;

    let page_sql = format!(
        "SELECT {} FROM {}{} ORDER BY {} {}, {} ASC LIMIT ? OFFSET ?",
        source.select, source.from, clause.sql, order_column, direction, source.id_column
    );
    debug!(sql = %page_sql, total, "Listing records");

    let rows = bind_all(sqlx::query(&page_sql), &clause.binds)
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(pool)
        .await?;

    let records = rows
        .iter()
        .map(map_row)
        .collect::<std::result::Result<Vec<T>, sqlx::Error>>()?;

    Ok((records, total))
}
