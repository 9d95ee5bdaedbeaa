//! Outlier detection (IQR fences, z-scores) and handling.
//!
//! Detection returns the flagged *values*; removal and transformation then
//! match rows by value. A value that is flagged once is therefore handled in
//! every row where it occurs.

use super::naming::resolve_column;
use super::types::{OutlierAction, OutlierMethod, OutlierThresholds};
use anyhow::{Context as _, Result};
use polars::prelude::*;
use std::collections::HashSet;

pub fn detect_outliers(df: &DataFrame, column: &str, method: OutlierMethod) -> Result<Vec<f64>> {
    detect_outliers_with(df, column, method, OutlierThresholds::default())
}

pub fn detect_outliers_with(
    df: &DataFrame,
    column: &str,
    method: OutlierMethod,
    thresholds: OutlierThresholds,
) -> Result<Vec<f64>> {
    let values = column_values(df, column)?;
    let outliers = match method {
        OutlierMethod::Iqr => iqr_outliers(&values, thresholds.iqr_multiplier)?,
        OutlierMethod::ZScore => zscore_outliers(&values, thresholds.zscore_threshold),
    };
    tracing::debug!(
        "{} flagged {} outliers in '{column}'",
        method.as_str(),
        outliers.len()
    );
    Ok(outliers)
}

/// Values strictly outside `[q25 - k*iqr, q75 + k*iqr]`, sorted ascending.
///
/// Quartiles use linear interpolation between closest ranks.
pub fn iqr_outliers(values: &Float64Chunked, multiplier: f64) -> Result<Vec<f64>> {
    let (Some(q25), Some(q75)) = (
        values.quantile(0.25, QuantileMethod::Linear)?,
        values.quantile(0.75, QuantileMethod::Linear)?,
    ) else {
        return Ok(Vec::new());
    };

    let iqr = q75 - q25;
    let lower = q25 - multiplier * iqr;
    let upper = q75 + multiplier * iqr;

    let mut outliers: Vec<f64> = values
        .into_iter()
        .flatten()
        .filter(|&v| v < lower || v > upper)
        .collect();
    outliers.sort_by(f64::total_cmp);
    Ok(outliers)
}

/// Values whose `|v - mean| / std` exceeds `threshold`, in row order.
///
/// Uses the population standard deviation. A constant column has no outliers.
pub fn zscore_outliers(values: &Float64Chunked, threshold: f64) -> Vec<f64> {
    let (Some(mean), Some(std)) = (values.mean(), values.std(0)) else {
        return Vec::new();
    };

    values
        .into_iter()
        .flatten()
        .filter(|&v| (v - mean).abs() / std > threshold)
        .collect()
}

/// Drop rows whose value in `column` is one of `outliers`.
///
/// Rows with a null in `column` are kept.
pub fn remove_outliers(df: &DataFrame, column: &str, outliers: &[f64]) -> Result<DataFrame> {
    let name = resolve_column(df, column)?;
    if outliers.is_empty() {
        return Ok(df.clone());
    }

    let flagged = value_set(outliers);
    let values = column_values(df, &name)?;
    let mask: Vec<bool> = values
        .into_iter()
        .map(|v| v.is_none_or(|x| !flagged.contains(&value_key(x))))
        .collect();
    let keep = BooleanChunked::from_slice("keep".into(), &mask);

    let out = df
        .filter(&keep)
        .with_context(|| format!("Failed to remove outliers from '{name}'"))?;
    tracing::debug!(
        "Removed {} rows with outliers in '{name}'",
        df.height() - out.height()
    );
    Ok(out)
}

/// Overwrite outlier values in `column` with the median of the remaining values.
///
/// The column becomes `Float64`. If every value is an outlier the median is
/// undefined and the flagged cells become null.
pub fn transform_outliers(df: &DataFrame, column: &str, outliers: &[f64]) -> Result<DataFrame> {
    let name = resolve_column(df, column)?;
    if outliers.is_empty() {
        return Ok(df.clone());
    }

    let flagged = value_set(outliers);
    let values = column_values(df, &name)?;
    let is_outlier = |v: f64| flagged.contains(&value_key(v));

    let inliers: Float64Chunked = values
        .into_iter()
        .map(|v| v.filter(|&x| !is_outlier(x)))
        .collect();
    let median = inliers.median();
    if median.is_none() {
        tracing::warn!("No inlier values left in '{name}'; outliers replaced with null");
    }

    let replaced: Vec<Option<f64>> = values
        .into_iter()
        .map(|v| match v {
            Some(x) if is_outlier(x) => median,
            other => other,
        })
        .collect();

    let mut out = df.clone();
    out.with_column(Series::new(name.as_str().into(), replaced))
        .with_context(|| format!("Failed to transform outliers in '{name}'"))?;
    Ok(out)
}

/// Detect with `method`, then remove or transform what was found.
pub fn handle_outliers(
    df: &DataFrame,
    column: &str,
    method: OutlierMethod,
    action: OutlierAction,
    thresholds: OutlierThresholds,
) -> Result<DataFrame> {
    let name = resolve_column(df, column)?;
    let outliers = detect_outliers_with(df, &name, method, thresholds)?;
    match action {
        OutlierAction::Remove => remove_outliers(df, &name, &outliers),
        OutlierAction::Transform => transform_outliers(df, &name, &outliers),
    }
}

fn column_values(df: &DataFrame, column: &str) -> Result<Float64Chunked> {
    let name = resolve_column(df, column)?;
    let series = df
        .column(&name)?
        .as_materialized_series()
        .cast(&DataType::Float64)
        .with_context(|| format!("Column '{name}' is not numeric"))?;
    Ok(series.f64()?.clone())
}

/// Bit pattern used for value matching; `-0.0` and `0.0` share one key.
fn value_key(v: f64) -> u64 {
    if v == 0.0 { 0.0_f64.to_bits() } else { v.to_bits() }
}

fn value_set(values: &[f64]) -> HashSet<u64> {
    values.iter().copied().map(value_key).collect()
}
