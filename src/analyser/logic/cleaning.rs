use super::naming::resolve_columns;
use super::types::ImputeMode;
use anyhow::{Context as _, Result};
use polars::prelude::*;

/// Drop the named columns. Unknown names fail before anything is removed.
pub fn remove_columns(df: &DataFrame, columns: &[String]) -> Result<DataFrame> {
    if columns.is_empty() {
        return Ok(df.clone());
    }
    let targets = resolve_columns(df, columns)?;

    let keep: Vec<Expr> = df
        .get_column_names()
        .iter()
        .filter(|name| !targets.iter().any(|t| t == name.as_str()))
        .map(|name| col(name.as_str()))
        .collect();

    df.clone()
        .lazy()
        .select(keep)
        .collect()
        .context("Failed to remove columns")
}

/// Nulls plus, for float columns, NaN values.
pub fn missing_count(column: &Column) -> usize {
    let nan = if column.dtype().is_float() {
        column
            .as_materialized_series()
            .is_nan()
            .map(|mask| mask.num_trues())
            .unwrap_or(0)
    } else {
        0
    };
    column.null_count() + nan
}

fn present(df: &DataFrame, name: &str) -> Result<Expr> {
    let expr = col(name).is_not_null();
    Ok(if df.column(name)?.dtype().is_float() {
        expr.and(col(name).is_not_nan())
    } else {
        expr
    })
}

fn without_nan(df: &DataFrame, name: &str) -> Result<Expr> {
    Ok(if df.column(name)?.dtype().is_float() {
        col(name).fill_nan(lit(NULL))
    } else {
        col(name)
    })
}

/// Drop every row with a null (or float NaN) in any of the named columns.
///
/// An empty selection is a no-op.
pub fn drop_rows_missing_in(df: &DataFrame, columns: &[String]) -> Result<DataFrame> {
    if columns.is_empty() {
        return Ok(df.clone());
    }
    let targets = resolve_columns(df, columns)?;

    let mut lf = df.clone().lazy();
    for name in &targets {
        lf = lf.filter(present(df, name)?);
    }
    let out = lf.collect().context("Failed to drop rows with missing values")?;

    tracing::debug!(
        "Dropped {} rows with missing values in {:?}",
        df.height() - out.height(),
        targets
    );
    Ok(out)
}

/// Replace nulls and NaNs in each named column with that column's mean, median or mode.
///
/// Fill values are computed from the input table, so columns never see each
/// other's fills. Mean and median on non-numeric columns produce a null
/// statistic and leave the column as it was.
pub fn fill_missing(df: &DataFrame, columns: &[String], method: ImputeMode) -> Result<DataFrame> {
    if columns.is_empty() {
        return Ok(df.clone());
    }
    let targets = resolve_columns(df, columns)?;

    let exprs = targets
        .iter()
        .map(|name| Ok(impute_expr(without_nan(df, name)?, name, method)))
        .collect::<Result<Vec<Expr>>>()?;

    let out = df
        .clone()
        .lazy()
        .with_columns(exprs)
        .collect()
        .with_context(|| format!("Failed to fill missing values using {}", method.as_str()))?;

    for name in &targets {
        let remaining = missing_count(out.column(name)?);
        if remaining > 0 {
            tracing::warn!(
                "Column '{name}' still has {remaining} missing values after {} fill",
                method.as_str()
            );
        }
    }

    Ok(out)
}

fn impute_expr(expr: Expr, name: &str, method: ImputeMode) -> Expr {
    let fill = match method {
        ImputeMode::Mean => expr.clone().mean(),
        ImputeMode::Median => expr.clone().median(),
        // polars returns every tied mode; sorting first picks the smallest
        ImputeMode::Mode => expr
            .clone()
            .drop_nulls()
            .mode()
            .sort(SortOptions::default())
            .first(),
    };
    expr.fill_null(fill).alias(name)
}
