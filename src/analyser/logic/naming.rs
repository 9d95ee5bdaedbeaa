//! Column name lookup shared by the transforms.

use crate::error::EdaError;
use anyhow::Result;
use polars::prelude::*;

/// Find the table's spelling of `name`.
///
/// An exact match wins; otherwise a column whose name equals `name` after
/// trimming surrounding whitespace is accepted, since the classifier reports
/// trimmed names.
pub fn resolve_column(df: &DataFrame, name: &str) -> Result<String> {
    let names = df.get_column_names();
    if let Some(exact) = names.iter().find(|n| n.as_str() == name) {
        return Ok(exact.to_string());
    }

    let wanted = name.trim();
    names
        .iter()
        .find(|n| n.as_str().trim() == wanted)
        .map(|n| n.to_string())
        .ok_or_else(|| EdaError::ColumnNotFound(name.to_owned()).into())
}

/// Resolve every name up front so a bad selection fails before any data is touched.
pub fn resolve_columns(df: &DataFrame, names: &[String]) -> Result<Vec<String>> {
    let mut resolved: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let actual = resolve_column(df, name)?;
        if !resolved.contains(&actual) {
            resolved.push(actual);
        }
    }
    Ok(resolved)
}
