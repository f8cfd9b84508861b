//! Shared API request/response types
//!
//! Every successful body is wrapped in `{"content": ...}`; list bodies add a
//! `_metadata` block. Errors always carry a stable symbolic `error_code` that
//! clients use for localised messaging, plus an English `detail`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ========================================
// Success Envelopes
// ========================================

/// Single-record response envelope
///
/// # Examples
///
/// ```
/// use training_common::api::types::ContentResponse;
///
/// let body = ContentResponse::new(42);
/// assert_eq!(body.content, 42);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentResponse<T> {
    pub content: T,
}

impl<T> ContentResponse<T> {
    pub fn new(content: T) -> Self {
        Self { content }
    }
}

/// List response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub content: Vec<T>,
    #[serde(rename = "_metadata")]
    pub metadata: ListMetadata,
}

/// Paging information returned with every list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMetadata {
    /// Page size actually applied
    pub limit: i64,
    /// Ordering actually applied (`field` or `-field`)
    pub order: String,
    /// Zero-based page index actually applied
    pub page: i64,
    /// Number of matching records before slicing
    pub total_records: i64,
    /// Non-fatal problems found in the query parameters
    pub warnings: Vec<String>,
}

// ========================================
// Error Bodies
// ========================================

/// Error body for request-level failures (400, 403, 404)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable symbolic code, e.g. `training_syllabus_read_001`
    pub error_code: String,
    /// Human-readable description of the code
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            detail: detail.into(),
        }
    }
}

/// Error body for field validation failures (400), keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub errors: BTreeMap<String, ErrorResponse>,
}

// ========================================
// Tests
// ========================================
