//! # Shelf Common Library
//!
//! Shared code for the shelf book catalog:
//! - Book record models and the SQLite-backed record store
//! - Configuration loading and root folder resolution
//! - Common error type
//! - Timestamp helpers

pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use db::{BookMetadata, BookRecord, BookStore, ReadingFields, ReadingStatus, SortOrder};
pub use error::{Error, Result};
