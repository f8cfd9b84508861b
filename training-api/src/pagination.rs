//! Pagination utilities for training-api
//!
//! Lists are sliced with zero-based `page` and `limit` query parameters.
//! Bad values never fail the request: they fall back to defaults and leave a
//! warning for the `_metadata` block.

use training_common::config::PaginationConfig;

/// Resolved page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (0-indexed)
    pub page: i64,
    /// Page size
    pub limit: i64,
    /// Offset for SQL LIMIT/OFFSET query
    pub offset: i64,
}

/// Calculate the SQL window for a sanitized page and limit
///
/// # Examples
/// ```
/// use training_api::pagination::calculate_pagination;
///
/// let p = calculate_pagination(2, 25);
/// assert_eq!(p.offset, 50);
/// ```
pub fn calculate_pagination(page: i64, limit: i64) -> Pagination {
    Pagination {
        page,
        limit,
        offset: page.saturating_mul(limit),
    }
}

/// Resolve the `page` parameter, falling back to 0
pub fn resolve_page(raw: Option<&str>, warnings: &mut Vec<String>) -> i64 {
    let Some(raw) = raw else {
        return 0;
    };

    match raw.trim().parse::<i64>() {
        Ok(page) if page >= 0 => page,
        _ => {
            warnings.push(format!(
                "\"page\": \"{}\" is not a valid page number. Using 0 instead.",
                raw
            ));
            0
        }
    }
}

/// Resolve the `limit` parameter against the configured bounds
pub fn resolve_limit(
    raw: Option<&str>,
    config: PaginationConfig,
    warnings: &mut Vec<String>,
) -> i64 {
    let Some(raw) = raw else {
        return config.default_limit;
    };

    match raw.trim().parse::<i64>() {
        Ok(limit) if limit > config.max_limit => {
            warnings.push(format!(
                "\"limit\": {} is above the maximum of {}. Using {} instead.",
                limit, config.max_limit, config.max_limit
            ));
            config.max_limit
        }
        Ok(limit) if limit >= 1 => limit,
        _ => {
            warnings.push(format!(
                "\"limit\": \"{}\" is not a valid page size. Using {} instead.",
                raw, config.default_limit
            ));
            config.default_limit
        }
    }
}
