//! wrangle - apply a Stata-style replace to a CSV file

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use wrangle::io::csv;
use wrangle::replace::replace;

/// Conditionally rewrite one column of a CSV file.
///
/// The value and the condition are expressions over the file's columns
/// and may reference neighboring rows with the `col[n+k]` / `col[n-k]`
/// notation.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input CSV file
    input: PathBuf,

    /// Column to modify
    #[arg(short, long)]
    column: String,

    /// Replacement value expression (literal, column name, or col[n+k])
    #[arg(short, long)]
    value: String,

    /// Condition selecting rows to modify (all rows when omitted)
    #[arg(short = 'w', long = "where", default_value = "")]
    condition: String,

    /// Output CSV file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let table = csv::read_csv(&args.input)?;
    log::debug!(
        "loaded {} rows x {} columns from {}",
        table.n_rows(),
        table.n_cols(),
        args.input.display()
    );

    let (result, changed) = replace(&table, &args.column, &args.value, &args.condition)
        .context("replace failed")?;

    match &args.output {
        Some(path) => csv::write_csv(&result, path)?,
        None => csv::write_to(&result, std::io::stdout().lock())?,
    }

    eprintln!("({} real changes made)", changed);
    Ok(())
}
