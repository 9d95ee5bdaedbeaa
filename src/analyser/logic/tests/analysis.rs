use super::{approx_eq, names, sample_frame, strings};
use crate::analyser::logic::*;
use anyhow::Result;
use polars::prelude::*;

#[test]
fn test_dataset_overview_counts_duplicates() -> Result<()> {
    let df = df![
        "a" => [1i64, 1, 2, 1],
        "b" => ["x", "x", "y", "x"],
    ]?;
    let overview = dataset_overview(&df, DEFAULT_CATEGORY_THRESHOLD)?;

    assert_eq!(overview.rows, 4);
    assert_eq!(overview.columns, 2);
    assert_eq!(overview.duplicate_rows, 2);
    assert_eq!(overview.partition.categorical, strings(&["a", "b"]));
    Ok(())
}

#[test]
fn test_missing_value_summary() -> Result<()> {
    let summary = missing_value_summary(&sample_frame()?);

    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].column, "age");
    assert_eq!(summary[0].missing_count, 2);
    assert!(approx_eq(summary[0].missing_pct, 100.0 / 3.0));
    assert_eq!(summary[1].column, "color");
    Ok(())
}

#[test]
fn test_describe_numeric() -> Result<()> {
    let df = df!["v" => [Some(1.0), Some(2.0), None, Some(3.0), Some(4.0)]]?;
    let rows = describe_numeric(&df, &strings(&["v"]))?;

    let row = &rows[0];
    assert_eq!(row.count, 4);
    assert_eq!(row.mean, Some(2.5));
    assert_eq!(row.min, Some(1.0));
    assert_eq!(row.max, Some(4.0));
    assert_eq!(row.median, Some(2.5));
    assert_eq!(row.q25, Some(1.75));
    assert_eq!(row.q75, Some(3.25));
    // sample standard deviation
    assert!(row.std.is_some_and(|s| approx_eq(s, (5.0f64 / 3.0).sqrt())));
    Ok(())
}

#[test]
fn test_feature_stats() -> Result<()> {
    let stats = feature_stats(&sample_frame()?, "age")?;
    assert_eq!(stats.count, 4);
    assert_eq!(stats.missing, 2);
    assert_eq!(stats.min, Some(22.0));
    assert_eq!(stats.max, Some(41.0));
    Ok(())
}

#[test]
fn test_value_counts_orders_by_frequency() -> Result<()> {
    let counts = value_counts(&sample_frame()?, "color")?;
    assert_eq!(
        counts,
        vec![
            ValueCount {
                value: "red".to_owned(),
                count: 3
            },
            ValueCount {
                value: "blue".to_owned(),
                count: 2
            },
        ]
    );
    Ok(())
}

#[test]
fn test_column_types_and_search() -> Result<()> {
    let df = sample_frame()?;
    let types = column_types(&df);
    assert_eq!(types.len(), 4);
    assert_eq!(types[2].name, "color");
    assert_eq!(types[2].dtype, DataType::String.to_string());

    let found = search_columns(&df, "CO", None)?;
    assert_eq!(names(&found), strings(&["color", "income"]));

    let numeric = search_columns(&df, "", Some(&DataType::Int64.to_string()))?;
    assert_eq!(names(&numeric), strings(&["id", "income"]));
    Ok(())
}

#[test]
fn test_group_means() -> Result<()> {
    let groups = group_means(&sample_frame()?, "color", "income")?;

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].group, "blue");
    assert!(groups[0].mean.is_some_and(|m| approx_eq(m, 51_000.0)));
    assert_eq!(groups[1].group, "red");
    assert!(groups[1].mean.is_some_and(|m| approx_eq(m, 42_000.0)));
    Ok(())
}

#[test]
fn test_correlation_matrix() -> Result<()> {
    let df = df![
        "x" => [1.0, 2.0, 3.0, 4.0],
        "up" => [2.0, 4.0, 6.0, 8.0],
        "down" => [8.0, 6.0, 4.0, 2.0],
    ]?;

    let matrix = correlation_matrix(&df, &strings(&["x", "up", "down"]))?;
    let Some(matrix) = matrix else {
        panic!("expected a matrix for three columns");
    };
    assert_eq!(matrix.columns, strings(&["x", "up", "down"]));
    assert!(matrix.get("x", "up").is_some_and(|r| approx_eq(r, 1.0)));
    assert!(matrix.get("up", "down").is_some_and(|r| approx_eq(r, -1.0)));
    assert!(matrix.get("x", "x").is_some_and(|r| approx_eq(r, 1.0)));

    assert!(correlation_matrix(&df, &strings(&["x"]))?.is_none());
    Ok(())
}
