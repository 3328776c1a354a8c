//! # Roster Common Library
//!
//! Shared code for the roster service:
//! - Employee record model, query filter and pagination window
//! - Database bootstrap (schema creation)
//! - Configuration loading and resolution
//! - Common error type

pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use db::models::{Employee, EmployeeDraft, EmployeeFilter, EmployeeInput, Window};
pub use error::{Error, Result};
