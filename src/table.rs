//! Column-oriented in-memory tables.
//!
//! This module provides the table abstraction the rest of the crate
//! operates on:
//!
//! - **Table**: ordered, named columns sharing one row index
//! - **Column**: a single named column of values
//! - **Value**: dynamically typed cell values with a `Null` missing sentinel
//! - **DataType**: the scalar types a column can hold

pub mod error;
pub mod frame;
pub mod value;

pub use error::{TableError, TableResult};
pub use frame::{Column, Table};
pub use value::{DataType, Value};
