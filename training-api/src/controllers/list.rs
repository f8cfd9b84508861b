//! List query validation
//!
//! Query string grammar:
//! - `search[field]=v` / `search[field__op]=v`: keep records matching
//! - `exclude[field]=v` / `exclude[field__op]=v`: drop records matching
//! - `order=field` or `order=-field` (descending)
//! - `page` (zero-based) and `limit`
//!
//! Unknown fields, unsupported operators and bad ordering or paging values are
//! dropped with a warning. A filter value that cannot be converted to the
//! field's type fails the whole request.

use tracing::debug;
use training_common::config::PaginationConfig;

use crate::controllers::fields::parse_iso_date;
use crate::db::query::BindValue;
use crate::error::{ApiError, ApiResult};
use crate::pagination::{resolve_limit, resolve_page};

/// Value type of a searchable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Date,
    Text,
}

/// Filter operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Exact,
    IExact,
    Contains,
    IContains,
    StartsWith,
    IStartsWith,
    EndsWith,
    IEndsWith,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Range,
    IsNull,
}

impl Operator {
    fn parse(name: &str) -> Option<Self> {
        let operator = match name {
            "exact" => Operator::Exact,
            "iexact" => Operator::IExact,
            "contains" => Operator::Contains,
            "icontains" => Operator::IContains,
            "startswith" => Operator::StartsWith,
            "istartswith" => Operator::IStartsWith,
            "endswith" => Operator::EndsWith,
            "iendswith" => Operator::IEndsWith,
            "gt" => Operator::Gt,
            "gte" => Operator::Gte,
            "lt" => Operator::Lt,
            "lte" => Operator::Lte,
            "in" => Operator::In,
            "range" => Operator::Range,
            "isnull" => Operator::IsNull,
            _ => return None,
        };
        Some(operator)
    }

    /// Operators a field of `kind` accepts
    fn allowed_for(self, kind: FieldKind) -> bool {
        use Operator::*;
        match kind {
            FieldKind::Integer | FieldKind::Date => {
                matches!(self, Exact | Gt | Gte | Lt | Lte | In | Range | IsNull)
            }
            FieldKind::Text => matches!(
                self,
                Exact
                    | IExact
                    | Contains
                    | IContains
                    | StartsWith
                    | IStartsWith
                    | EndsWith
                    | IEndsWith
                    | In
                    | IsNull
            ),
        }
    }
}

/// Filter operand, shaped by the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    One(BindValue),
    Many(Vec<BindValue>),
    Range(BindValue, BindValue),
    Null(bool),
}

/// One validated `search` or `exclude` condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: &'static str,
    pub operator: Operator,
    /// `exclude[...]` rather than `search[...]`
    pub negate: bool,
    pub value: FilterValue,
}

/// Applied ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering {
    pub field: &'static str,
    pub descending: bool,
}

impl Ordering {
    /// Echo form used in list metadata (`field` or `-field`)
    pub fn as_param(&self) -> String {
        if self.descending {
            format!("-{}", self.field)
        } else {
            self.field.to_string()
        }
    }
}

/// Searchable field declaration
#[derive(Debug, Clone, Copy)]
pub struct SearchField {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Per-resource list rules
#[derive(Debug)]
pub struct ListMeta {
    /// Code returned when a filter value cannot be converted
    pub invalid_code: &'static str,
    pub search_fields: &'static [SearchField],
    /// Orderable fields; the first is the default
    pub allowed_ordering: &'static [&'static str],
}

impl ListMeta {
    fn search_field(&self, name: &str) -> Option<SearchField> {
        self.search_fields.iter().copied().find(|f| f.name == name)
    }

    fn default_ordering(&self) -> Ordering {
        Ordering {
            field: self.allowed_ordering.first().copied().unwrap_or("id"),
            descending: false,
        }
    }
}

/// Fully validated list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub filters: Vec<Filter>,
    pub order: Ordering,
    pub page: i64,
    pub limit: i64,
}

/// Validates list query parameters
#[derive(Debug)]
pub struct ListController {
    pub query: ListQuery,
    pub warnings: Vec<String>,
}

impl ListController {
    /// Validate raw query parameters against a resource's list rules
    pub fn validate(
        meta: &ListMeta,
        params: &[(String, String)],
        pagination: PaginationConfig,
    ) -> ApiResult<Self> {
        let mut warnings = Vec::new();
        let mut filters = Vec::new();
        let mut order = None;
        let mut page = None;
        let mut limit = None;

        for (key, value) in params {
            if let Some(inner) = bracketed(key, "search") {
                if let Some(filter) = parse_filter(meta, key, inner, value, false, &mut warnings)? {
                    filters.push(filter);
                }
            } else if let Some(inner) = bracketed(key, "exclude") {
                if let Some(filter) = parse_filter(meta, key, inner, value, true, &mut warnings)? {
                    filters.push(filter);
                }
            } else {
                match key.as_str() {
                    "order" => order = Some(value.as_str()),
                    "page" => page = Some(value.as_str()),
                    "limit" => limit = Some(value.as_str()),
                    _ => debug!(key = %key, "Ignoring unknown list parameter"),
                }
            }
        }

        let query = ListQuery {
            filters,
            order: resolve_ordering(meta, order, &mut warnings),
            page: resolve_page(page, &mut warnings),
            limit: resolve_limit(limit, pagination, &mut warnings),
        };

        Ok(Self { query, warnings })
    }
}

/// `prefix[inner]` → `inner`
fn bracketed<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    key.strip_prefix(prefix)?
        .strip_prefix('[')?
        .strip_suffix(']')
}

/// Split `field__op` into a declared field and an operator
///
/// Field names may themselves contain `__` (`syllabus__name`), so the whole
/// key is tried as a field before peeling off a trailing operator.
fn split_lookup(meta: &ListMeta, lookup: &str) -> Option<(SearchField, Operator)> {
    if let Some(field) = meta.search_field(lookup) {
        return Some((field, Operator::Exact));
    }
    let (field_name, op_name) = lookup.rsplit_once("__")?;
    let field = meta.search_field(field_name)?;
    let operator = Operator::parse(op_name)?;
    Some((field, operator))
}

fn parse_filter(
    meta: &ListMeta,
    key: &str,
    lookup: &str,
    raw: &str,
    negate: bool,
    warnings: &mut Vec<String>,
) -> ApiResult<Option<Filter>> {
    let Some((field, operator)) = split_lookup(meta, lookup) else {
        warnings.push(format!(
            "\"{}\": \"{}\" is not a valid search field. It has been ignored.",
            key, lookup
        ));
        return Ok(None);
    };

    if !operator.allowed_for(field.kind) {
        warnings.push(format!(
            "\"{}\": the operator is not supported for \"{}\". It has been ignored.",
            key, field.name
        ));
        return Ok(None);
    }

    let value = convert_operand(field.kind, operator, raw)
        .ok_or(ApiError::BadRequest(meta.invalid_code))?;

    Ok(Some(Filter {
        field: field.name,
        operator,
        negate,
        value,
    }))
}

fn convert_scalar(kind: FieldKind, raw: &str) -> Option<BindValue> {
    match kind {
        FieldKind::Integer => raw.trim().parse().ok().map(BindValue::Int),
        FieldKind::Date => parse_iso_date(raw.trim()).map(|d| BindValue::Text(d.to_string())),
        FieldKind::Text => Some(BindValue::Text(raw.to_string())),
    }
}

fn convert_operand(kind: FieldKind, operator: Operator, raw: &str) -> Option<FilterValue> {
    match operator {
        Operator::IsNull => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(FilterValue::Null(true)),
            "false" | "0" => Some(FilterValue::Null(false)),
            _ => None,
        },
        Operator::In => {
            if raw.trim().is_empty() {
                return Some(FilterValue::Many(Vec::new()));
            }
            raw.split(',')
                .map(|item| convert_scalar(kind, item.trim()))
                .collect::<Option<Vec<_>>>()
                .map(FilterValue::Many)
        }
        Operator::Range => {
            let mut bounds = raw.split(',');
            let low = convert_scalar(kind, bounds.next()?.trim())?;
            let high = convert_scalar(kind, bounds.next()?.trim())?;
            if bounds.next().is_some() {
                return None;
            }
            Some(FilterValue::Range(low, high))
        }
        _ => convert_scalar(kind, raw).map(FilterValue::One),
    }
}

fn resolve_ordering(meta: &ListMeta, raw: Option<&str>, warnings: &mut Vec<String>) -> Ordering {
    let default = meta.default_ordering();
    let Some(raw) = raw else {
        return default;
    };

    let trimmed = raw.trim();
    let (descending, name) = match trimmed.strip_prefix('-') {
        Some(name) => (true, name),
        None => (false, trimmed),
    };

    match meta.allowed_ordering.iter().copied().find(|field| *field == name) {
        Some(field) => Ordering {
            field,
            descending,
        },
        None => {
            warnings.push(format!(
                "\"order\": \"{}\" is not a valid ordering. Using \"{}\" instead.",
                raw,
                default.as_param()
            ));
            default
        }
    }
}
