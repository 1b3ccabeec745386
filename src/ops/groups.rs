//! Group-wise helpers keyed on column value equality.
//!
//! Groups are identified by key equality in physical row order, never by
//! sorting: the input order is an invariant these helpers must not
//! disturb.

use crate::table::{Table, TableError, TableResult, Value};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// What `sequence_in_group` writes per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    /// 1-based position of the row within its key group, in physical order
    RowNumber,
    /// Total number of rows in the row's key group
    GroupSize,
}

/// Hashable wrapper so rows can be grouped by their key values.
/// Floats group by bit pattern, which keeps NaN keys in one group.
#[derive(Debug, Clone)]
struct GroupKey(Vec<Value>);

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(&other.0)
                .all(|(a, b)| match (a, b) {
                    (Value::Float64(x), Value::Float64(y)) => x.to_bits() == y.to_bits(),
                    _ => a == b,
                })
    }
}

impl Eq for GroupKey {}

impl Hash for GroupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for value in &self.0 {
            std::mem::discriminant(value).hash(state);
            match value {
                Value::Null => {}
                Value::Boolean(b) => b.hash(state),
                Value::Int64(i) => i.hash(state),
                Value::Float64(f) => f.to_bits().hash(state),
                Value::String(s) => s.hash(state),
            }
        }
    }
}

fn row_key(table: &Table, keys: &[&str], row: usize) -> GroupKey {
    GroupKey(
        keys.iter()
            .filter_map(|k| table.value(row, k).cloned())
            .collect(),
    )
}

fn check_keys(table: &Table, keys: &[&str]) -> TableResult<()> {
    for key in keys {
        if !table.has_column(key) {
            return Err(TableError::UnknownColumn(key.to_string()));
        }
    }
    Ok(())
}

/// Append a sequence column computed per key group.
///
/// The Stata idiom `bysort keys: gen seq = _n` (or `_N`), minus the sort:
/// rows keep their physical order and groups are simply all rows sharing
/// the same key values.
pub fn sequence_in_group(
    table: &Table,
    keys: &[&str],
    new_column: &str,
    kind: SequenceKind,
) -> TableResult<Table> {
    check_keys(table, keys)?;

    let n = table.n_rows();
    let values = match kind {
        SequenceKind::RowNumber => {
            let mut counters: HashMap<GroupKey, i64> = HashMap::new();
            (0..n)
                .map(|row| {
                    let counter = counters.entry(row_key(table, keys, row)).or_insert(0);
                    *counter += 1;
                    Value::Int64(*counter)
                })
                .collect()
        }
        SequenceKind::GroupSize => {
            let mut totals: HashMap<GroupKey, i64> = HashMap::new();
            for row in 0..n {
                *totals.entry(row_key(table, keys, row)).or_insert(0) += 1;
            }
            (0..n)
                .map(|row| Value::Int64(totals[&row_key(table, keys, row)]))
                .collect()
        }
    };

    let mut out = table.clone();
    out.add_column(new_column, values)?;
    Ok(out)
}

/// Append a column naming, per row, the non-key columns whose values
/// differ somewhere within the row's key group.
///
/// Rows whose group is internally consistent (true duplicates up to the
/// key) get an empty string; everything else gets the comma-separated
/// offending column names in table order.
pub fn duplicate_conflicts(
    table: &Table,
    keys: &[&str],
    new_column: &str,
) -> TableResult<Table> {
    check_keys(table, keys)?;

    let n = table.n_rows();
    let mut groups: HashMap<GroupKey, Vec<usize>> = HashMap::new();
    for row in 0..n {
        groups
            .entry(row_key(table, keys, row))
            .or_default()
            .push(row);
    }

    let mut conflicts: Vec<String> = vec![String::new(); n];
    for rows in groups.values() {
        if rows.len() < 2 {
            continue;
        }
        let mut differing: Vec<&str> = Vec::new();
        for column in table.columns() {
            if keys.contains(&column.name()) {
                continue;
            }
            let first = &column.values()[rows[0]];
            if rows[1..].iter().any(|&r| &column.values()[r] != first) {
                differing.push(column.name());
            }
        }
        let label = differing.join(",");
        for &row in rows {
            conflicts[row] = label.clone();
        }
    }

    let mut out = table.clone();
    out.add_column(
        new_column,
        conflicts.into_iter().map(Value::String).collect(),
    )?;
    Ok(out)
}
