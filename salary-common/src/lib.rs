//! # Salary Transparency Common Library
//!
//! Shared code for the salary dashboard including:
//! - Canonical salary record model
//! - Schema normalization (column aliasing, type coercion, text cleanup)
//! - Record stores (CSV file and SQLite)
//! - Submission ingestion and validation
//! - Summary metrics and FX rate lookup
//! - Reference lists for the submission form
//! - Configuration loading

pub mod config;
pub mod error;
pub mod fx;
pub mod ingest;
pub mod normalize;
pub mod record;
pub mod reference;
pub mod store;
pub mod summary;
pub mod time;

pub use error::{Error, Result};
pub use ingest::{FormInput, Ingestor, SubmitError, ValidationError};
pub use normalize::{normalize, RawRow};
pub use record::{Degree, Field, SalaryRecord};
pub use reference::ReferenceLists;
pub use store::{CsvStore, RecordStore, SqliteStore, StoreBackend};
