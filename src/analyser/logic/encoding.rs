//! Categorical encoders.
//!
//! Both encoders read values through their string form for non-numeric
//! columns, so booleans encode as `"true"`/`"false"` categories.

use super::naming::resolve_columns;
use super::types::EncodingMethod;
use anyhow::{Context as _, Result};
use polars::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet};

pub fn encode(df: &DataFrame, columns: &[String], method: EncodingMethod) -> Result<DataFrame> {
    match method {
        EncodingMethod::OneHot => one_hot_encode(df, columns),
        EncodingMethod::Label => label_encode(df, columns),
    }
}

/// Replace each named column with `{column}_{value}` indicator columns.
///
/// Indicators are inserted where the source column was, in the order values
/// are first seen, and hold `0`/`1` as `Int32`. Every category is kept.
pub fn one_hot_encode(df: &DataFrame, columns: &[String]) -> Result<DataFrame> {
    if columns.is_empty() {
        return Ok(df.clone());
    }
    let targets = resolve_columns(df, columns)?;

    let mut out: Vec<Column> = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        if targets.iter().any(|t| t == column.name().as_str()) {
            let indicators = indicator_columns(column)
                .with_context(|| format!("Failed to one-hot encode '{}'", column.name()))?;
            tracing::debug!(
                "One-hot encoded '{}' into {} columns",
                column.name(),
                indicators.len()
            );
            out.extend(indicators);
        } else {
            out.push(column.clone());
        }
    }

    DataFrame::new(out).context("Failed to assemble one-hot encoded table")
}

fn indicator_columns(column: &Column) -> Result<Vec<Column>> {
    let text = column.as_materialized_series().cast(&DataType::String)?;
    let labels = text.str()?;

    let mut seen = HashSet::new();
    let mut categories: Vec<&str> = Vec::new();
    for label in labels.into_iter().flatten() {
        if seen.insert(label) {
            categories.push(label);
        }
    }

    let columns = categories
        .iter()
        .map(|category| {
            let values: Vec<i32> = labels
                .into_iter()
                .map(|v| i32::from(v == Some(*category)))
                .collect();
            let name = format!("{}_{}", column.name(), category);
            Column::from(Series::new(name.into(), values))
        })
        .collect();

    Ok(columns)
}

/// Replace each named column's values with integer codes.
///
/// Codes `0..k-1` follow the sorted order of the distinct values (numeric
/// order for numeric columns, lexicographic otherwise). Each column gets its
/// own mapping; nulls stay null.
pub fn label_encode(df: &DataFrame, columns: &[String]) -> Result<DataFrame> {
    if columns.is_empty() {
        return Ok(df.clone());
    }
    let targets = resolve_columns(df, columns)?;

    let mut out = df.clone();
    for name in &targets {
        let codes = label_codes(df.column(name)?)
            .with_context(|| format!("Failed to label encode '{name}'"))?;
        out.with_column(codes)?;
    }
    Ok(out)
}

fn label_codes(column: &Column) -> Result<Series> {
    let series = column.as_materialized_series();

    let codes: Vec<Option<i64>> = if series.dtype().is_numeric() {
        let values = series.cast(&DataType::Float64)?;
        let ca = values.f64()?;
        let mut distinct: Vec<f64> = ca.into_iter().flatten().collect();
        distinct.sort_by(f64::total_cmp);
        distinct.dedup_by(|a, b| a.total_cmp(b).is_eq());

        ca.into_iter()
            .map(|v| {
                v.and_then(|x| {
                    distinct
                        .binary_search_by(|probe| probe.total_cmp(&x))
                        .ok()
                        .map(|code| code as i64)
                })
            })
            .collect()
    } else {
        let text = series.cast(&DataType::String)?;
        let ca = text.str()?;
        let distinct: BTreeSet<&str> = ca.into_iter().flatten().collect();
        let mapping: HashMap<&str, i64> = distinct
            .into_iter()
            .enumerate()
            .map(|(code, value)| (value, code as i64))
            .collect();

        ca.into_iter()
            .map(|v| v.and_then(|s| mapping.get(s).copied()))
            .collect()
    };

    Ok(Series::new(column.name().clone(), codes))
}
