use anyhow::Result;
use polars::prelude::*;

mod analysis;
mod encoding;

/// A small table with one of everything the transforms care about.
fn sample_frame() -> Result<DataFrame> {
    Ok(df![
        "id" => [1i64, 2, 3, 4, 5, 6],
        "age" => [Some(22.0), None, Some(35.0), Some(41.0), None, Some(29.0)],
        "color" => [Some("red"), Some("blue"), Some("red"), None, Some("blue"), Some("red")],
        "income" => [30_000i64, 42_000, 51_000, 39_000, 60_000, 45_000],
    ]?)
}

fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}

fn names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
