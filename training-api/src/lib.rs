//! training-api library - tenant-scoped training records service
//!
//! REST resources for Syllabuses, the Classes run from them, and the
//! Students enrolled in those Classes. Every record belongs to one Member
//! (tenant); callers only ever see and change their own Member's records.

use std::sync::Arc;

use axum::{middleware, Router};
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use training_common::config::PaginationConfig;

pub mod api;
pub mod controllers;
pub mod db;
pub mod directory;
pub mod error;
pub mod error_codes;
pub mod pagination;
pub mod permissions;
pub mod presenters;

pub use directory::{Caller, Directory, MembershipClient};
pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Token and user lookups
    pub directory: Arc<dyn Directory>,
    /// List page size bounds
    pub pagination: PaginationConfig,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, directory: Arc<dyn Directory>, pagination: PaginationConfig) -> Self {
        Self {
            db,
            directory,
            pagination,
        }
    }
}

/// Build application router
///
/// `/health` is public; every resource route requires a token.
pub fn build_router(state: AppState) -> Router {
    // Protected routes (require authentication)
    let protected = Router::new()
        .merge(api::syllabus_routes())
        .merge(api::cls_routes())
        .merge(api::student_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    // Public routes (no authentication)
    let public = Router::new().merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
