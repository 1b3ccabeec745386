//! CSV import and export for tables.

use crate::table::{Table, Value};
use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;

/// Read a CSV file (headers required) into a table.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    read_from(file).with_context(|| format!("failed to read {}", path.display()))
}

/// Read CSV data from any reader into a table.
///
/// Column types are inferred per column: Int64 where every non-empty
/// field parses as an integer, then Float64, then Boolean, otherwise
/// text. Empty fields become `Null`.
pub fn read_from<R: std::io::Read>(reader: R) -> Result<Table> {
    let mut rdr = csv::ReaderBuilder::new().from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("failed to read CSV headers")?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut fields: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in rdr.records() {
        let record = record.context("failed to read CSV record")?;
        for (column, field) in fields.iter_mut().zip(record.iter()) {
            column.push(field.to_string());
        }
    }

    let mut table = Table::new();
    for (name, column) in headers.into_iter().zip(fields) {
        table.add_column(name, infer_column(&column))?;
    }
    Ok(table)
}

/// Write a table to a CSV file.
pub fn write_csv(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write_to(table, file).with_context(|| format!("failed to write {}", path.display()))
}

/// Write a table as CSV to any writer. `Null` cells come out empty.
pub fn write_to<W: std::io::Write>(table: &Table, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(table.column_names())?;
    for row in 0..table.n_rows() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|c| c.values()[row].to_string())
            .collect();
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn infer_column(fields: &[String]) -> Vec<Value> {
    let non_empty: Vec<&String> = fields.iter().filter(|f| !f.is_empty()).collect();

    if non_empty.iter().all(|f| f.parse::<i64>().is_ok()) {
        parse_column(fields, |f| f.parse::<i64>().ok().map(Value::Int64))
    } else if non_empty.iter().all(|f| f.parse::<f64>().is_ok()) {
        parse_column(fields, |f| f.parse::<f64>().ok().map(Value::Float64))
    } else if non_empty.iter().all(|f| parse_bool(f).is_some()) {
        parse_column(fields, |f| parse_bool(f).map(Value::Boolean))
    } else {
        fields
            .iter()
            .map(|f| {
                if f.is_empty() {
                    Value::Null
                } else {
                    Value::String(f.clone())
                }
            })
            .collect()
    }
}

fn parse_column<F>(fields: &[String], parse: F) -> Vec<Value>
where
    F: Fn(&str) -> Option<Value>,
{
    fields
        .iter()
        .map(|f| {
            if f.is_empty() {
                Value::Null
            } else {
                parse(f).unwrap_or(Value::Null)
            }
        })
        .collect()
}

fn parse_bool(field: &str) -> Option<bool> {
    if field.eq_ignore_ascii_case("true") {
        Some(true)
    } else if field.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
