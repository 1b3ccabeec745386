//! The row-relative replace engine.
//!
//! Three stages sit behind one call: parse the condition and value
//! expressions, materialize a shifted copy of every column a relative
//! reference touches, then evaluate the mask and the replacement values
//! row by row and assign into a copy of the table.

pub mod engine;
pub mod error;
pub mod shift;

pub use engine::{replace, simple_replace};
pub use error::{ReplaceError, ReplaceResult};
pub use shift::{materialize_shifts, shifted_column};
