//! Column-oriented table container.
//!
//! A `Table` is an ordered collection of named columns that all share one
//! row index `0..N-1`. Columns are dynamically typed: a cell holds any
//! `Value`, and a column may mix types (for example after `Null` is
//! assigned into an integer column). Row order is physical and
//! significant — relative references in the replace engine are defined
//! against it.

use crate::table::error::{TableError, TableResult};
use crate::table::value::{DataType, Value};

/// A single named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The uniform type of the non-null values, if there is one.
    pub fn data_type(&self) -> Option<DataType> {
        let mut result = None;
        for value in &self.values {
            match (result, value.data_type()) {
                (_, None) => {}
                (None, Some(t)) => result = Some(t),
                (Some(seen), Some(t)) if seen == t => {}
                _ => return None,
            }
        }
        result
    }
}

/// An in-memory table with named, ordered columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create an empty table (no columns, no rows).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(name, values)` pairs.
    ///
    /// All columns must have the same length; names must be distinct.
    pub fn from_columns<I, S>(columns: I) -> TableResult<Self>
    where
        I: IntoIterator<Item = (S, Vec<Value>)>,
        S: Into<String>,
    {
        let mut table = Table::new();
        for (name, values) in columns {
            table.add_column(name, values)?;
        }
        Ok(table)
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.len())
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name() == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Append a column. The length must match the existing row count
    /// (any length is accepted for the first column).
    pub fn add_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> TableResult<()> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(TableError::DuplicateColumn(name));
        }
        if !self.columns.is_empty() && values.len() != self.n_rows() {
            return Err(TableError::LengthMismatch {
                name,
                len: values.len(),
                expected: self.n_rows(),
            });
        }
        self.columns.push(Column::new(name, values));
        Ok(())
    }

    /// Value at `(row, column)`, or None if either is out of range.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        self.column(column).and_then(|c| c.values.get(row))
    }

    pub fn set_value(&mut self, row: usize, column: &str, value: Value) -> TableResult<()> {
        let rows = self.n_rows();
        let col = self
            .columns
            .iter_mut()
            .find(|c| c.name() == column)
            .ok_or_else(|| TableError::UnknownColumn(column.to_string()))?;
        if row >= rows {
            return Err(TableError::RowOutOfRange { row, rows });
        }
        col.values[row] = value;
        Ok(())
    }

    /// All values in a row, in column order.
    pub fn row(&self, row: usize) -> TableResult<Vec<&Value>> {
        if row >= self.n_rows() {
            return Err(TableError::RowOutOfRange {
                row,
                rows: self.n_rows(),
            });
        }
        Ok(self.columns.iter().map(|c| &c.values[row]).collect())
    }

    pub fn rename_column(&mut self, old: &str, new: impl Into<String>) -> TableResult<()> {
        let new = new.into();
        if new != old && self.has_column(&new) {
            return Err(TableError::DuplicateColumn(new));
        }
        let col = self
            .columns
            .iter_mut()
            .find(|c| c.name() == old)
            .ok_or_else(|| TableError::UnknownColumn(old.to_string()))?;
        col.name = new;
        Ok(())
    }

    /// Move a column to the given index (clamped to the end).
    pub fn move_column_to(&mut self, name: &str, index: usize) -> TableResult<()> {
        let from = self
            .column_index(name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))?;
        let col = self.columns.remove(from);
        let index = index.min(self.columns.len());
        self.columns.insert(index, col);
        Ok(())
    }

    /// Remove a row and return its values in column order.
    pub fn take_row(&mut self, row: usize) -> TableResult<Vec<Value>> {
        if row >= self.n_rows() {
            return Err(TableError::RowOutOfRange {
                row,
                rows: self.n_rows(),
            });
        }
        Ok(self
            .columns
            .iter_mut()
            .map(|c| c.values.remove(row))
            .collect())
    }

    /// Insert a row at the given index (`index == n_rows` appends).
    pub fn insert_row(&mut self, row: usize, values: Vec<Value>) -> TableResult<()> {
        if values.len() != self.n_cols() {
            return Err(TableError::LengthMismatch {
                name: format!("row {}", row),
                len: values.len(),
                expected: self.n_cols(),
            });
        }
        if row > self.n_rows() {
            return Err(TableError::RowOutOfRange {
                row,
                rows: self.n_rows(),
            });
        }
        for (col, value) in self.columns.iter_mut().zip(values) {
            col.values.insert(row, value);
        }
        Ok(())
    }
}
