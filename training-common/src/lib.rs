//! # Training Common Library
//!
//! Shared code for the training records service:
//! - Persisted models (Syllabus, Class, Student)
//! - Database pool initialisation and schema
//! - API envelope and error response types
//! - Bootstrap configuration loading

pub mod api;
pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
