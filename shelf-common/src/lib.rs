//! # Shelf Common Library
//!
//! Shared code for the Shelf binaries including:
//! - ISBN identity core (cleaning, validation, conversion, variant sets)
//! - Book record model and merge-on-write reconciliation
//! - Record store contract with memory, shelf-file, and SQLite backends
//! - Configuration loading
//! - Error types

pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod isbn;
pub mod reconcile;
pub mod record;
pub mod store;
pub mod time;

pub use error::{Error, Result};
pub use record::{BookFields, BookRecord};
