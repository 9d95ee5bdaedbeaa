//! Working-copy context for interactive preprocessing.
//!
//! An [`EdaSession`] owns two tables: the data as loaded and the working copy
//! that transforms replace one at a time. The caller owns the session, so
//! any number of them can coexist.
//!
//! ```text
//! ORIGINAL_LOADED ──transform──> WORKING ──transform──> WORKING
//!        ^                          │
//!        └─────────revert───────────┘      export: no state change
//! ```
//!
//! A transform is computed into a new table and only then swapped in. When
//! it fails (unknown column, polars error) the working copy is left exactly
//! as it was and the session stays usable.

use crate::analyser::logic::{
    self, ColumnPartition, DatasetOverview, EncodingMethod, ImputeMode, OutlierAction,
    OutlierMethod, OutlierThresholds, ScalingMethod,
};
use crate::config::AppSettings;
use crate::pipeline::Step;
use anyhow::{Context as _, Result};
use polars::prelude::*;
use serde::Serialize;
use std::io::{Read, Write};
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// Working copy equals the loaded data
    OriginalLoaded,
    /// At least one transform has been applied since load or revert
    Working,
}

/// One transform applied to the working copy.
#[derive(Clone, Debug, Serialize)]
pub struct AppliedStep {
    pub description: String,
    pub rows_after: usize,
    pub columns_after: usize,
}

#[derive(Clone, Debug)]
pub struct EdaSession {
    original: DataFrame,
    working: DataFrame,
    history: Vec<AppliedStep>,
    category_threshold: usize,
    thresholds: OutlierThresholds,
}

impl EdaSession {
    pub fn new(df: DataFrame) -> Self {
        Self::with_settings(df, &AppSettings::default())
    }

    pub fn with_settings(df: DataFrame, settings: &AppSettings) -> Self {
        tracing::info!(
            "Session started with {} rows x {} columns",
            df.height(),
            df.width()
        );
        Self {
            working: df.clone(),
            original: df,
            history: Vec::new(),
            category_threshold: settings.category_threshold,
            thresholds: settings.outlier_thresholds(),
        }
    }

    pub fn from_csv_path(path: &Path, settings: &AppSettings) -> Result<Self> {
        let df = logic::load_df(path, settings.io_options())
            .with_context(|| format!("Failed to load {}", path.display()))?;
        Ok(Self::with_settings(df, settings))
    }

    pub fn from_csv_reader<R: Read>(reader: R, settings: &AppSettings) -> Result<Self> {
        let df = logic::load_df_from_reader(reader, settings.io_options())?;
        Ok(Self::with_settings(df, settings))
    }

    pub fn state(&self) -> SessionState {
        if self.history.is_empty() {
            SessionState::OriginalLoaded
        } else {
            SessionState::Working
        }
    }

    pub fn original(&self) -> &DataFrame {
        &self.original
    }

    pub fn working(&self) -> &DataFrame {
        &self.working
    }

    pub fn history(&self) -> &[AppliedStep] {
        &self.history
    }

    pub fn outlier_thresholds(&self) -> OutlierThresholds {
        self.thresholds
    }

    /// Classify the current working copy. Re-run after encoding or column removal.
    pub fn partition(&self) -> Result<ColumnPartition> {
        logic::classify_with_threshold(&self.working, self.category_threshold)
    }

    pub fn overview(&self) -> Result<DatasetOverview> {
        logic::dataset_overview(&self.working, self.category_threshold)
    }

    /// Apply one pipeline step to the working copy.
    pub fn apply(&mut self, step: &Step) -> Result<&DataFrame> {
        let df = &self.working;
        let next = match step {
            Step::DropColumns { columns } => logic::remove_columns(df, columns),
            Step::DropMissingRows { columns } => logic::drop_rows_missing_in(df, columns),
            Step::FillMissing { method, columns } => logic::fill_missing(df, columns, *method),
            Step::Encode { method, columns } => logic::encode(df, columns, *method),
            Step::Scale { method, columns } => logic::scale(df, columns, *method),
            Step::Outliers {
                column,
                method,
                action,
                thresholds,
            } => logic::handle_outliers(
                df,
                column,
                *method,
                *action,
                thresholds.unwrap_or(self.thresholds),
            ),
        };
        self.commit(step.description(), next)
    }

    pub fn drop_columns(&mut self, columns: &[String]) -> Result<&DataFrame> {
        self.apply(&Step::DropColumns {
            columns: columns.to_vec(),
        })
    }

    pub fn drop_rows_missing_in(&mut self, columns: &[String]) -> Result<&DataFrame> {
        self.apply(&Step::DropMissingRows {
            columns: columns.to_vec(),
        })
    }

    pub fn fill_missing(&mut self, columns: &[String], method: ImputeMode) -> Result<&DataFrame> {
        self.apply(&Step::FillMissing {
            method,
            columns: columns.to_vec(),
        })
    }

    pub fn encode(&mut self, columns: &[String], method: EncodingMethod) -> Result<&DataFrame> {
        self.apply(&Step::Encode {
            method,
            columns: columns.to_vec(),
        })
    }

    pub fn scale(&mut self, columns: &[String], method: ScalingMethod) -> Result<&DataFrame> {
        self.apply(&Step::Scale {
            method,
            columns: columns.to_vec(),
        })
    }

    /// Detect outliers in `column` and remove or transform them in one go.
    pub fn handle_outliers(
        &mut self,
        column: &str,
        method: OutlierMethod,
        action: OutlierAction,
    ) -> Result<&DataFrame> {
        self.apply(&Step::Outliers {
            column: column.to_owned(),
            method,
            action,
            thresholds: None,
        })
    }

    /// Outlier values in `column` of the working copy, without changing it.
    pub fn detect_outliers(&self, column: &str, method: OutlierMethod) -> Result<Vec<f64>> {
        logic::detect_outliers_with(&self.working, column, method, self.thresholds)
    }

    /// Remove rows holding a previously detected outlier value.
    pub fn remove_outliers(&mut self, column: &str, outliers: &[f64]) -> Result<&DataFrame> {
        let next = logic::remove_outliers(&self.working, column, outliers);
        self.commit(
            format!("Remove {} outlier values from '{column}'", outliers.len()),
            next,
        )
    }

    /// Replace previously detected outlier values with the inlier median.
    pub fn transform_outliers(&mut self, column: &str, outliers: &[f64]) -> Result<&DataFrame> {
        let next = logic::transform_outliers(&self.working, column, outliers);
        self.commit(
            format!("Transform {} outlier values in '{column}'", outliers.len()),
            next,
        )
    }

    /// Discard every transform and start again from the loaded data.
    pub fn revert(&mut self) {
        tracing::info!("Reverting {} applied steps", self.history.len());
        self.working = self.original.clone();
        self.history.clear();
    }

    pub fn export_csv<W: Write>(&self, writer: W) -> Result<()> {
        logic::write_csv(&self.working, writer)
    }

    pub fn export_csv_to_path(&self, path: &Path) -> Result<()> {
        logic::save_df(&self.working, path)?;
        tracing::info!(
            "Exported {} rows to {}",
            self.working.height(),
            path.display()
        );
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.export_csv(&mut buf)?;
        String::from_utf8(buf).context("CSV output is not valid UTF-8")
    }

    fn commit(&mut self, description: String, next: Result<DataFrame>) -> Result<&DataFrame> {
        match next {
            Ok(df) => {
                tracing::info!(
                    "{description}: {} rows x {} columns",
                    df.height(),
                    df.width()
                );
                self.history.push(AppliedStep {
                    description,
                    rows_after: df.height(),
                    columns_after: df.width(),
                });
                self.working = df;
                Ok(&self.working)
            }
            Err(e) => {
                tracing::warn!("{description} failed: {e:#}");
                Err(e)
            }
        }
    }
}

/// Sessions built from in-memory data use default settings.
impl From<DataFrame> for EdaSession {
    fn from(df: DataFrame) -> Self {
        Self::new(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EdaError;

    fn session() -> Result<EdaSession> {
        let df = df![
            "age" => [Some(20.0), None, Some(40.0), Some(35.0), Some(300.0)],
            "color" => ["red", "blue", "red", "green", "blue"],
        ]?;
        Ok(EdaSession::new(df))
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_owned()).collect()
    }

    #[test]
    fn test_transforms_chain_on_working_copy() -> Result<()> {
        let mut session = session()?;
        assert_eq!(session.state(), SessionState::OriginalLoaded);

        session.fill_missing(&cols(&["age"]), ImputeMode::Median)?;
        session.encode(&cols(&["color"]), EncodingMethod::OneHot)?;

        assert_eq!(session.state(), SessionState::Working);
        assert_eq!(session.working().column("age")?.null_count(), 0);
        assert!(session.working().column("color").is_err());
        assert!(session.working().column("color_green").is_ok());
        assert_eq!(session.original().width(), 2);
        assert_eq!(session.history().len(), 2);
        Ok(())
    }

    #[test]
    fn test_revert_restores_original_exactly() -> Result<()> {
        let mut session = session()?;
        session.drop_rows_missing_in(&cols(&["age"]))?;
        session.scale(&cols(&["age"]), ScalingMethod::Standardization)?;
        session.drop_columns(&cols(&["color"]))?;

        session.revert();

        assert!(session.working().equals_missing(session.original()));
        assert_eq!(session.state(), SessionState::OriginalLoaded);
        assert!(session.history().is_empty());
        Ok(())
    }

    #[test]
    fn test_failed_transform_leaves_working_copy() -> Result<()> {
        let mut session = session()?;
        session.drop_rows_missing_in(&cols(&["age"]))?;
        let before = session.working().clone();

        let err = session
            .fill_missing(&cols(&["age", "weight"]), ImputeMode::Mean)
            .err();

        assert!(err.is_some_and(|e| EdaError::is_column_not_found(&e)));
        assert!(session.working().equals_missing(&before));
        assert_eq!(session.history().len(), 1);
        Ok(())
    }

    #[test]
    fn test_outlier_detect_then_remove() -> Result<()> {
        let mut session = session()?;
        let outliers = session.detect_outliers("age", OutlierMethod::Iqr)?;
        assert_eq!(outliers, vec![300.0]);

        session.remove_outliers("age", &outliers)?;
        assert_eq!(session.working().height(), 4);
        assert!(session.detect_outliers("age", OutlierMethod::Iqr)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_handle_outliers_transform() -> Result<()> {
        let mut session = session()?;
        session.handle_outliers("age", OutlierMethod::Iqr, OutlierAction::Transform)?;
        assert_eq!(session.working().height(), 5);
        assert_eq!(session.history().len(), 1);
        Ok(())
    }

    #[test]
    fn test_export_does_not_change_state() -> Result<()> {
        let mut session = session()?;
        session.drop_columns(&cols(&["age"]))?;

        let csv = session.to_csv_string()?;

        assert!(csv.starts_with("color\n"));
        assert_eq!(csv.lines().count(), 6);
        assert_eq!(session.state(), SessionState::Working);
        Ok(())
    }

    #[test]
    fn test_load_from_reader() -> Result<()> {
        let data = "a,b\n1,x\n2,y\n";
        let session = EdaSession::from_csv_reader(data.as_bytes(), &AppSettings::default())?;
        assert_eq!(session.working().shape(), (2, 2));
        assert_eq!(session.partition()?.categorical, cols(&["a", "b"]));
        Ok(())
    }
}
