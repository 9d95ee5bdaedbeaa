//! Read-only summaries shown alongside the preprocessing controls.

use super::classify::classify_with_threshold;
use super::cleaning::missing_count;
use super::naming::{resolve_column, resolve_columns};
use super::types::{
    ColumnTypeInfo, CorrelationMatrix, DatasetOverview, FeatureStats, GroupMean,
    MissingValueSummary, NumericSummary, ValueCount,
};
use anyhow::{Context as _, Result};
use polars::prelude::*;
use std::collections::HashMap;

pub fn dataset_overview(df: &DataFrame, category_threshold: usize) -> Result<DatasetOverview> {
    let partition = classify_with_threshold(df, category_threshold)?;
    let duplicate_rows = if df.width() == 0 {
        0
    } else {
        let unique = df
            .clone()
            .lazy()
            .unique_stable(None, UniqueKeepStrategy::First)
            .collect()
            .context("Failed to count duplicate rows")?;
        df.height() - unique.height()
    };

    Ok(DatasetOverview {
        rows: df.height(),
        columns: df.width(),
        duplicate_rows,
        partition,
    })
}

/// Columns with at least one missing value (null or float NaN), most missing first.
pub fn missing_value_summary(df: &DataFrame) -> Vec<MissingValueSummary> {
    let rows = df.height();
    let mut summary: Vec<MissingValueSummary> = df
        .get_columns()
        .iter()
        .map(|c| (c, missing_count(c)))
        .filter(|(_, missing)| *missing > 0)
        .map(|(c, missing)| MissingValueSummary {
            column: c.name().to_string(),
            missing_count: missing,
            missing_pct: if rows == 0 {
                0.0
            } else {
                missing as f64 / rows as f64 * 100.0
            },
        })
        .collect();
    summary.sort_by(|a, b| b.missing_count.cmp(&a.missing_count));
    summary
}

/// Count, mean, sample std, min, quartiles and max for each named column.
pub fn describe_numeric(df: &DataFrame, columns: &[String]) -> Result<Vec<NumericSummary>> {
    resolve_columns(df, columns)?
        .into_iter()
        .map(|name| {
            let values = float_values(df, &name)?;
            Ok(NumericSummary {
                count: values.len() - values.null_count(),
                mean: values.mean(),
                std: values.std(1),
                min: values.min(),
                q25: values.quantile(0.25, QuantileMethod::Linear)?,
                median: values.median(),
                q75: values.quantile(0.75, QuantileMethod::Linear)?,
                max: values.max(),
                column: name,
            })
        })
        .collect()
}

pub fn feature_stats(df: &DataFrame, column: &str) -> Result<FeatureStats> {
    let name = resolve_column(df, column)?;
    let values = float_values(df, &name)?;
    Ok(FeatureStats {
        count: values.len() - values.null_count(),
        missing: missing_count(df.column(&name)?),
        mean: values.mean(),
        std: values.std(1),
        min: values.min(),
        max: values.max(),
        column: name,
    })
}

/// Frequency of each non-null value, most frequent first.
///
/// Ties keep the order in which values first appear.
pub fn value_counts(df: &DataFrame, column: &str) -> Result<Vec<ValueCount>> {
    let name = resolve_column(df, column)?;
    let text = df
        .column(&name)?
        .as_materialized_series()
        .cast(&DataType::String)?;

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<ValueCount> = Vec::new();
    for value in text.str()?.into_iter().flatten() {
        match index.get(value) {
            Some(&i) => {
                if let Some(entry) = counts.get_mut(i) {
                    entry.count += 1;
                }
            }
            None => {
                index.insert(value, counts.len());
                counts.push(ValueCount {
                    value: value.to_owned(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(counts)
}

pub fn column_types(df: &DataFrame) -> Vec<ColumnTypeInfo> {
    df.get_columns()
        .iter()
        .map(|c| ColumnTypeInfo {
            name: c.name().to_string(),
            dtype: c.dtype().to_string(),
        })
        .collect()
}

/// Columns whose name contains `query` (case-insensitive), optionally
/// restricted to one dtype by its display name (e.g. `i64`, `str`).
pub fn search_columns(df: &DataFrame, query: &str, dtype: Option<&str>) -> Result<DataFrame> {
    let query = query.to_lowercase();
    let names: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|c| query.is_empty() || c.name().to_lowercase().contains(&query))
        .filter(|c| dtype.is_none_or(|d| c.dtype().to_string().eq_ignore_ascii_case(d)))
        .map(|c| c.name().to_string())
        .collect();

    df.select(names).context("Failed to select matching columns")
}

/// Mean of `numerical` for each non-null value of `categorical`, ordered by group key.
pub fn group_means(df: &DataFrame, categorical: &str, numerical: &str) -> Result<Vec<GroupMean>> {
    let cat = resolve_column(df, categorical)?;
    let num = resolve_column(df, numerical)?;

    let grouped = df
        .clone()
        .lazy()
        .filter(col(cat.as_str()).is_not_null())
        .group_by([col(cat.as_str())])
        .agg([col(num.as_str()).cast(DataType::Float64).mean().alias("mean")])
        .sort_by_exprs(vec![col(cat.as_str())], SortMultipleOptions::default())
        .collect()
        .with_context(|| format!("Failed to group '{num}' by '{cat}'"))?;

    let keys = grouped
        .column(&cat)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    let means = grouped
        .column("mean")?
        .as_materialized_series()
        .cast(&DataType::Float64)?;

    Ok(keys
        .str()?
        .into_iter()
        .zip(means.f64()?.into_iter())
        .map(|(group, mean)| GroupMean {
            group: group.unwrap_or_default().to_owned(),
            mean,
        })
        .collect())
}

/// Pearson correlation between every pair of the named columns, using rows
/// where both values are present. Returns `None` for fewer than two columns.
pub fn correlation_matrix(df: &DataFrame, columns: &[String]) -> Result<Option<CorrelationMatrix>> {
    let names = resolve_columns(df, columns)?;
    if names.len() < 2 {
        return Ok(None);
    }

    let values = names
        .iter()
        .map(|name| float_values(df, name))
        .collect::<Result<Vec<_>>>()?;

    let mut matrix = Vec::with_capacity(values.len());
    for (i, a) in values.iter().enumerate() {
        let mut row = Vec::with_capacity(values.len());
        for (j, b) in values.iter().enumerate() {
            if i == j {
                row.push(1.0);
            } else {
                row.push(pairwise_pearson(a, b));
            }
        }
        matrix.push(row);
    }

    Ok(Some(CorrelationMatrix {
        columns: names,
        data: matrix,
    }))
}

/// NaN when fewer than two complete pairs remain or either side is constant.
fn pairwise_pearson(a: &Float64Chunked, b: &Float64Chunked) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .into_iter()
        .zip(b.into_iter())
        .filter_map(|(x, y)| Some((x?, y?)))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let x_mean = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let y_mean = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;
    let mut sum_y2 = 0.0;
    for (x, y) in &pairs {
        let dx = x - x_mean;
        let dy = y - y_mean;
        sum_xy += dx * dy;
        sum_x2 += dx * dx;
        sum_y2 += dy * dy;
    }

    sum_xy / (sum_x2 * sum_y2).sqrt()
}

fn float_values(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)
        .with_context(|| format!("Column '{name}' is not numeric"))?;
    Ok(series.f64()?.clone())
}
