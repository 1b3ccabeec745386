//! File boundaries for tables.
//!
//! Everything here is a thin wrapper: tables come in, tables go out, and
//! the replace engine never knows where they came from.

pub mod csv;
