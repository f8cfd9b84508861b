//! Shared HTTP API types
//!
//! Response envelopes and error bodies used by every training resource.
//! This module has no HTTP framework dependency; the service wraps these
//! types with axum responses.

pub mod types;

pub use types::{
    ContentResponse, ErrorResponse, ListMetadata, ListResponse, ValidationErrorResponse,
};
