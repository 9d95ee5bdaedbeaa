//! Categorical vs. numerical column heuristic.
//!
//! A column is categorical when it has few distinct values or when its dtype
//! is not numeric at all (strings, booleans, dates). Everything else is
//! numerical. Small-cardinality numeric columns such as 0/1 flags or integer
//! codes therefore land in the categorical set on purpose.

use super::types::ColumnPartition;
use anyhow::{Context as _, Result};
use polars::prelude::*;

/// Distinct-value count at or below which a column is treated as categorical.
pub const DEFAULT_CATEGORY_THRESHOLD: usize = 30;

pub fn classify(df: &DataFrame) -> Result<ColumnPartition> {
    classify_with_threshold(df, DEFAULT_CATEGORY_THRESHOLD)
}

pub fn classify_with_threshold(df: &DataFrame, threshold: usize) -> Result<ColumnPartition> {
    let mut partition = ColumnPartition::default();

    for column in df.get_columns() {
        let name = column.name().trim().to_owned();
        let distinct = distinct_non_null(column)
            .with_context(|| format!("Failed to count distinct values of '{name}'"))?;

        if distinct <= threshold || !column.dtype().is_numeric() {
            partition.categorical.push(name);
        } else {
            partition.numerical.push(name);
        }
    }

    tracing::debug!(
        numerical = partition.numerical.len(),
        categorical = partition.categorical.len(),
        "Classified columns"
    );

    Ok(partition)
}

fn distinct_non_null(column: &Column) -> PolarsResult<usize> {
    column.as_materialized_series().drop_nulls().n_unique()
}
