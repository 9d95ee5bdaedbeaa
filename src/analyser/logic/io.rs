use anyhow::{Context as _, Result};
use polars::prelude::*;
use std::io::{Read, Write};
use std::path::Path;

/// Options applied when parsing CSV input.
#[derive(Clone, Copy, Debug)]
pub struct IoOptions {
    pub infer_schema_length: usize,
}

impl Default for IoOptions {
    fn default() -> Self {
        Self {
            infer_schema_length: 10_000,
        }
    }
}

/// Tokens read as missing in addition to empty fields, as pandas does by default.
pub const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn na_values() -> NullValues {
    NullValues::AllColumns(NA_TOKENS.iter().map(|t| PlSmallStr::from(*t)).collect())
}

pub fn load_df(path: &Path, options: IoOptions) -> Result<DataFrame> {
    if !path.exists() {
        return Err(crate::error::EdaError::InvalidPath(path.display().to_string()).into());
    }

    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" | "txt" | "" => LazyCsvReader::new(path)
            .with_infer_schema_length(Some(options.infer_schema_length))
            .with_has_header(true)
            .with_null_values(Some(na_values()))
            .finish()
            .context("Failed to scan CSV")?
            .collect()
            .with_context(|| format!("Failed to read CSV {}", path.display())),
        _ => Err(anyhow::anyhow!("Unsupported file extension: {ext}")),
    }
}

/// Parse CSV from an in-memory stream, e.g. an uploaded file.
pub fn load_df_from_reader<R: Read>(mut reader: R, options: IoOptions) -> Result<DataFrame> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .context("Failed to read CSV stream")?;

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(options.infer_schema_length))
        .map_parse_options(|parse| parse.with_null_values(Some(na_values())))
        .into_reader_with_file_handle(std::io::Cursor::new(bytes))
        .finish()
        .context("Failed to parse CSV stream")
}

/// Serialize a table as CSV with a header row.
pub fn write_csv<W: Write>(df: &DataFrame, writer: W) -> Result<()> {
    let mut df = df.clone();
    CsvWriter::new(writer)
        .include_header(true)
        .finish(&mut df)
        .context("Failed to write CSV")
}

pub fn save_df(df: &DataFrame, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);
    write_csv(df, &mut writer)?;
    writer.flush().context("Failed to flush CSV file")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EdaError;

    #[test]
    fn test_reader_infers_types() -> Result<()> {
        let csv = "age,city\n31,Leeds\n,York\n45,Leeds\n";
        let df = load_df_from_reader(csv.as_bytes(), IoOptions::default())?;

        assert_eq!(df.shape(), (3, 2));
        assert_eq!(df.column("age")?.dtype(), &DataType::Int64);
        assert_eq!(df.column("age")?.null_count(), 1);
        Ok(())
    }

    #[test]
    fn test_na_tokens_are_missing() -> Result<()> {
        let csv = "age,city\n25,London\nNA,Paris\n31,NaN\n,Berlin\nnull,N/A\n";
        let df = load_df_from_reader(csv.as_bytes(), IoOptions::default())?;

        assert_eq!(df.column("age")?.dtype(), &DataType::Int64);
        assert_eq!(df.column("age")?.null_count(), 3);
        assert_eq!(df.column("city")?.null_count(), 2);
        Ok(())
    }

    #[test]
    fn test_save_then_load() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.csv");
        let df = df!["x" => [1.5, 2.5], "flag" => [true, false]]?;

        save_df(&df, &path)?;
        let text = std::fs::read_to_string(&path)?;
        assert!(text.starts_with("x,flag\n1.5,true\n"));

        let back = load_df(&path, IoOptions::default())?;
        assert!(back.equals_missing(&df));
        Ok(())
    }

    #[test]
    fn test_missing_path() {
        let err = load_df(Path::new("no/such/file.csv"), IoOptions::default()).err();
        assert!(err.is_some_and(|e| matches!(
            e.downcast_ref::<EdaError>(),
            Some(EdaError::InvalidPath(_))
        )));
    }
}
