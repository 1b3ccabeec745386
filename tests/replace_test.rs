use wrangle::io::csv;
use wrangle::ops::{self, ColumnPosition, SequenceKind};
use wrangle::replace::{replace, simple_replace, ReplaceError};
use wrangle::table::{Table, Value};

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().map(|&v| Value::Int64(v)).collect()
}

fn sample() -> Table {
    Table::from_columns(vec![
        ("a", ints(&[10, 20, 30])),
        ("b", ints(&[1, 2, 3])),
    ])
    .unwrap()
}

#[test]
fn test_shift_direction_is_look_ahead() {
    // a[n+1] under "a > 15": row 0 fails the condition and keeps 10,
    // row 1 reads row 2's value, row 2 reads past the end and goes
    // missing. This test pins the shift direction.
    let table = sample();
    let (out, count) = replace(&table, "a", "a[n+1]", "a > 15").unwrap();

    assert_eq!(
        out.column("a").unwrap().values(),
        &[Value::Int64(10), Value::Int64(30), Value::Null]
    );
    assert_eq!(count, 2);
}

#[test]
fn test_look_behind() {
    let table = sample();
    let (out, _) = replace(&table, "b", "a[n-1]", "").unwrap();

    assert_eq!(
        out.column("b").unwrap().values(),
        &[Value::Null, Value::Int64(10), Value::Int64(20)]
    );
}

#[test]
fn test_unmasked_rows_untouched() {
    let table = sample();
    let (out, _) = replace(&table, "a", "999", "b == 2").unwrap();

    assert_eq!(out.value(0, "a"), table.value(0, "a"));
    assert_eq!(out.value(2, "a"), table.value(2, "a"));
    assert_eq!(out.value(1, "a"), Some(&Value::Int64(999)));
    // The other column is untouched everywhere
    assert_eq!(out.column("b"), table.column("b"));
}

#[test]
fn test_count_excludes_no_op_assignments() {
    let table = sample();
    // All three rows are masked, but row 1 already holds 20.
    let (_, count) = replace(&table, "a", "20", "").unwrap();
    assert_eq!(count, 2);

    // Assigning a column onto itself changes nothing.
    let (_, count) = replace(&table, "a", "a", "").unwrap();
    assert_eq!(count, 0);
}

#[test]
fn test_empty_condition_hits_every_row() {
    let table = sample();
    let (out, count) = replace(&table, "b", "0", "").unwrap();

    assert_eq!(out.column("b").unwrap().values(), &ints(&[0, 0, 0])[..]);
    assert_eq!(count, 3);
}

#[test]
fn test_missing_column_leaves_table_alone() {
    let table = sample();
    let result = replace(&table, "b", "missing_col", "");

    assert_eq!(
        result,
        Err(ReplaceError::MissingColumn {
            name: "missing_col".to_string()
        })
    );
    assert_eq!(table, sample());
}

#[test]
fn test_missing_target_column() {
    let table = sample();
    let result = replace(&table, "ghost", "1", "");
    assert_eq!(
        result,
        Err(ReplaceError::MissingColumn {
            name: "ghost".to_string()
        })
    );
}

#[test]
fn test_idempotence() {
    // The condition reads b, the assignment writes a: applying the call
    // to its own output changes nothing further.
    let table = sample();
    let (once, first_count) = replace(&table, "a", "b[n+1]", "b >= 2").unwrap();
    let (twice, second_count) = replace(&once, "a", "b[n+1]", "b >= 2").unwrap();

    assert!(first_count > 0);
    assert_eq!(once, twice);
    assert_eq!(second_count, 0);
}

#[test]
fn test_zero_offset_reference() {
    let table = sample();
    let (out, count) = replace(&table, "b", "a[n]", "").unwrap();

    assert_eq!(out.column("b").unwrap().values(), &ints(&[10, 20, 30])[..]);
    assert_eq!(count, 3);
}

#[test]
fn test_out_of_range_reference_is_unselected_not_an_error() {
    let table = sample();
    // b[n-1] is missing on row 0; missing == 1 is unknown, so row 0
    // stays out even though its neighbor test would otherwise match.
    let (out, count) = replace(&table, "a", "0", "b[n-1] == 1").unwrap();

    assert_eq!(out.value(0, "a"), Some(&Value::Int64(10)));
    assert_eq!(out.value(1, "a"), Some(&Value::Int64(0)));
    assert_eq!(count, 1);
}

#[test]
fn test_compound_condition() {
    let table = Table::from_columns(vec![
        ("price", ints(&[5, 8, 8, 12])),
        ("qty", ints(&[0, 1, 0, 1])),
    ])
    .unwrap();

    let (out, count) = replace(&table, "price", "0", "qty == 0 & price[n-1] >= 5").unwrap();

    // Row 0 has no predecessor, so its neighbor test is unknown and the
    // row stays out; row 2 is the only match.
    assert_eq!(
        out.column("price").unwrap().values(),
        &[
            Value::Int64(5),
            Value::Int64(8),
            Value::Int64(0),
            Value::Int64(12)
        ]
    );
    assert_eq!(count, 1);
}

#[test]
fn test_malformed_expressions() {
    let table = sample();

    for bad in ["a >", "a[x+1] == 1", "a[n+1.5] == 1", "a ++", "(a > 1"] {
        let result = replace(&table, "a", "1", bad);
        assert!(
            matches!(result, Err(ReplaceError::MalformedExpression { .. })),
            "expected MalformedExpression for {:?}",
            bad
        );
    }

    let result = replace(&table, "a", "b[n+", "");
    assert!(matches!(
        result,
        Err(ReplaceError::MalformedExpression { .. })
    ));
}

#[test]
fn test_simple_replace_broadcast() {
    let table = sample();
    let (out, count) = simple_replace(&table, "a", Value::Null, "a >= 20").unwrap();

    assert_eq!(
        out.column("a").unwrap().values(),
        &[Value::Int64(10), Value::Null, Value::Null]
    );
    assert_eq!(count, 2);
}

#[test]
fn test_string_condition_and_value() {
    let table = Table::from_columns(vec![
        (
            "status",
            vec![
                Value::String("open".to_string()),
                Value::String("closed".to_string()),
                Value::String("open".to_string()),
            ],
        ),
        ("score", ints(&[1, 2, 3])),
    ])
    .unwrap();

    let (out, count) = replace(&table, "status", "'done'", "status == 'open'").unwrap();
    assert_eq!(count, 2);
    assert_eq!(
        out.value(1, "status"),
        Some(&Value::String("closed".to_string()))
    );
    assert_eq!(
        out.value(2, "status"),
        Some(&Value::String("done".to_string()))
    );
}

#[test]
fn test_csv_round_trip_through_replace() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out.csv");

    std::fs::write(&input, "price,qty\n10,1\n20,0\n30,2\n").unwrap();

    let table = csv::read_csv(&input).unwrap();
    let (result, count) = replace(&table, "price", "price[n+1]", "qty == 0").unwrap();
    assert_eq!(count, 1);
    csv::write_csv(&result, &output).unwrap();

    let reloaded = csv::read_csv(&output).unwrap();
    assert_eq!(reloaded.value(1, "price"), Some(&Value::Int64(30)));
    assert_eq!(reloaded.value(0, "price"), Some(&Value::Int64(10)));
}

#[test]
fn test_ops_pipeline() {
    let mut table = Table::from_columns(vec![
        ("case", ints(&[1, 1, 2])),
        ("amount", ints(&[10, 10, 7])),
    ])
    .unwrap();

    ops::rename_columns(&mut table, &[("amount", "value")]).unwrap();
    ops::move_column(&mut table, "value", ColumnPosition::First).unwrap();
    assert_eq!(table.column_names(), vec!["value", "case"]);

    let with_seq =
        ops::sequence_in_group(&table, &["case"], "seq", SequenceKind::RowNumber).unwrap();
    assert_eq!(
        with_seq.column("seq").unwrap().values(),
        &ints(&[1, 2, 1])[..]
    );

    let with_conflicts = ops::duplicate_conflicts(&table, &["case"], "problems").unwrap();
    assert_eq!(
        with_conflicts.value(0, "problems"),
        Some(&Value::String(String::new()))
    );
}
