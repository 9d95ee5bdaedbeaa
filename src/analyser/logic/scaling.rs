use super::naming::resolve_columns;
use super::types::ScalingMethod;
use anyhow::{Context as _, Result};
use polars::prelude::*;

pub fn scale(df: &DataFrame, columns: &[String], method: ScalingMethod) -> Result<DataFrame> {
    match method {
        ScalingMethod::Standardization => standard_scale(df, columns),
        ScalingMethod::MinMax { range } => min_max_scale(df, columns, range),
    }
}

/// `(v - mean) / std` per column, with the population standard deviation.
///
/// A constant column divides by zero and comes out as NaN.
pub fn standard_scale(df: &DataFrame, columns: &[String]) -> Result<DataFrame> {
    if columns.is_empty() {
        return Ok(df.clone());
    }
    let targets = resolve_columns(df, columns)?;

    for name in &targets {
        let values = numeric_values(df, name)?;
        if values.std(0).is_some_and(|s| s == 0.0) {
            tracing::warn!("Column '{name}' has zero variance; standardization yields NaN");
        }
    }

    let exprs: Vec<Expr> = targets
        .iter()
        .map(|name| {
            let x = col(name.as_str()).cast(DataType::Float64);
            ((x.clone() - x.clone().mean()) / x.std(0)).alias(name.as_str())
        })
        .collect();

    df.clone()
        .lazy()
        .with_columns(exprs)
        .collect()
        .context("Failed to standardize columns")
}

/// Map each column's `[min, max]` linearly onto `range`.
///
/// A constant column divides by zero and comes out as NaN.
pub fn min_max_scale(df: &DataFrame, columns: &[String], range: (f64, f64)) -> Result<DataFrame> {
    if columns.is_empty() {
        return Ok(df.clone());
    }
    let targets = resolve_columns(df, columns)?;
    let (lo, hi) = range;

    for name in &targets {
        let values = numeric_values(df, name)?;
        if let (Some(min), Some(max)) = (values.min(), values.max())
            && min == max
        {
            tracing::warn!("Column '{name}' is constant; min-max scaling yields NaN");
        }
    }

    let exprs: Vec<Expr> = targets
        .iter()
        .map(|name| {
            let x = col(name.as_str()).cast(DataType::Float64);
            let min = x.clone().min();
            let max = x.clone().max();
            (lit(lo) + (x - min.clone()) / (max - min) * lit(hi - lo)).alias(name.as_str())
        })
        .collect();

    df.clone()
        .lazy()
        .with_columns(exprs)
        .collect()
        .context("Failed to min-max scale columns")
}

fn numeric_values(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)
        .with_context(|| format!("Column '{name}' is not numeric"))?;
    Ok(series.f64()?.clone())
}
