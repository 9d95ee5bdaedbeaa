//! Pipeline specification data structures.
//!
//! A spec is a versioned, named, ordered list of preprocessing steps stored
//! as JSON. Each step maps onto one session transform.

use crate::analyser::logic::{
    EncodingMethod, ImputeMode, OutlierAction, OutlierMethod, OutlierThresholds, ScalingMethod,
};
use crate::config::AppSettings;
use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current pipeline spec version
pub const SPEC_VERSION: &str = "0.1";

/// Root pipeline specification structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSpec {
    /// Specification version for future migrations
    pub version: String,

    /// Human-readable pipeline name
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Ordered sequence of transformation steps
    pub steps: Vec<Step>,

    /// Abort on the first failing step instead of skipping it
    #[serde(default)]
    pub stop_on_error: bool,
}

impl PipelineSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: SPEC_VERSION.to_owned(),
            name: name.into(),
            description: None,
            steps: Vec::new(),
            stop_on_error: false,
        }
    }

    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Load a pipeline spec from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pipeline spec {}", path.display()))?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse pipeline spec JSON")
    }

    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path.as_ref(), json).context("Failed to write pipeline spec file")
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize pipeline spec")
    }

    /// Example spec touching every step kind, for `autoeda spec-template`.
    pub fn template(settings: &AppSettings) -> Self {
        let mut spec = Self::new("Example preprocessing");
        spec.description =
            Some("Replace the column names with ones from your dataset".to_owned());
        spec.with_step(Step::DropColumns {
            columns: vec!["id".to_owned()],
        })
        .with_step(Step::DropMissingRows {
            columns: vec!["target".to_owned()],
        })
        .with_step(Step::FillMissing {
            method: ImputeMode::Median,
            columns: vec!["age".to_owned()],
        })
        .with_step(Step::Outliers {
            column: "income".to_owned(),
            method: OutlierMethod::Iqr,
            action: OutlierAction::Transform,
            thresholds: Some(settings.outlier_thresholds()),
        })
        .with_step(Step::Encode {
            method: EncodingMethod::OneHot,
            columns: vec!["color".to_owned()],
        })
        .with_step(Step::Scale {
            method: ScalingMethod::MinMax {
                range: settings.default_scale_range,
            },
            columns: vec!["age".to_owned(), "income".to_owned()],
        })
    }
}

/// Transformation step (tagged enum)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    DropColumns {
        columns: Vec<String>,
    },

    /// Drop rows with a null in any of the named columns
    DropMissingRows {
        columns: Vec<String>,
    },

    FillMissing {
        method: ImputeMode,
        columns: Vec<String>,
    },

    Encode {
        method: EncodingMethod,
        columns: Vec<String>,
    },

    Scale {
        method: ScalingMethod,
        columns: Vec<String>,
    },

    /// Detect outliers in one column, then remove or transform them
    Outliers {
        column: String,
        method: OutlierMethod,
        action: OutlierAction,
        /// Session thresholds apply when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thresholds: Option<OutlierThresholds>,
    },
}

impl Step {
    pub fn op_name(&self) -> &'static str {
        match self {
            Self::DropColumns { .. } => "drop_columns",
            Self::DropMissingRows { .. } => "drop_missing_rows",
            Self::FillMissing { .. } => "fill_missing",
            Self::Encode { .. } => "encode",
            Self::Scale { .. } => "scale",
            Self::Outliers { .. } => "outliers",
        }
    }

    /// Columns the step reads, in the order given.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Self::DropColumns { columns }
            | Self::DropMissingRows { columns }
            | Self::FillMissing { columns, .. }
            | Self::Encode { columns, .. }
            | Self::Scale { columns, .. } => columns.iter().map(String::as_str).collect(),
            Self::Outliers { column, .. } => vec![column.as_str()],
        }
    }

    /// Steps that only make sense on numeric columns.
    pub fn requires_numeric(&self) -> bool {
        match self {
            Self::FillMissing { method, .. } => method.requires_numeric(),
            Self::Scale { .. } | Self::Outliers { .. } => true,
            Self::DropColumns { .. } | Self::DropMissingRows { .. } | Self::Encode { .. } => false,
        }
    }

    pub fn description(&self) -> String {
        match self {
            Self::DropColumns { columns } => format!("Remove columns {}", list(columns)),
            Self::DropMissingRows { columns } => {
                format!("Drop rows missing {}", list(columns))
            }
            Self::FillMissing { method, columns } => {
                format!("Fill missing {} with {}", list(columns), method.as_str())
            }
            Self::Encode { method, columns } => {
                format!("{} {}", method.as_str(), list(columns))
            }
            Self::Scale { method, columns } => format!("{} {}", method.as_str(), list(columns)),
            Self::Outliers {
                column,
                method,
                action,
                ..
            } => format!("{} in '{column}' ({})", action.as_str(), method.as_str()),
        }
    }
}

fn list(columns: &[String]) -> String {
    format!("[{}]", columns.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_serialization() -> Result<()> {
        let spec = PipelineSpec::new("test_pipeline")
            .with_step(Step::DropColumns {
                columns: vec!["col1".to_owned(), "col2".to_owned()],
            })
            .with_step(Step::Scale {
                method: ScalingMethod::Standardization,
                columns: vec!["age".to_owned()],
            });

        let json = spec.to_json()?;
        assert!(json.contains("\"version\": \"0.1\""));
        assert!(json.contains("\"op\": \"drop_columns\""));
        assert!(json.contains("\"kind\": \"standardization\""));

        let parsed = PipelineSpec::from_json(&json)?;
        assert_eq!(parsed, spec);
        Ok(())
    }

    #[test]
    fn test_parse_hand_written_spec() -> Result<()> {
        let json = r#"{
            "version": "0.1",
            "name": "clean",
            "steps": [
                { "op": "fill_missing", "method": "mode", "columns": ["city"] },
                { "op": "encode", "method": "label", "columns": ["city"] },
                { "op": "scale", "method": { "kind": "min_max" }, "columns": ["age"] },
                { "op": "outliers", "column": "age", "method": "z_score", "action": "remove" }
            ]
        }"#;

        let spec = PipelineSpec::from_json(json)?;
        assert!(!spec.stop_on_error);
        assert_eq!(spec.steps.len(), 4);
        assert_eq!(
            spec.steps[2],
            Step::Scale {
                method: ScalingMethod::MinMax { range: (0.0, 1.0) },
                columns: vec!["age".to_owned()],
            }
        );
        assert!(matches!(
            spec.steps[3],
            Step::Outliers {
                method: OutlierMethod::ZScore,
                action: OutlierAction::Remove,
                thresholds: None,
                ..
            }
        ));
        Ok(())
    }

    #[test]
    fn test_unknown_op_is_rejected() {
        let json = r#"{ "version": "0.1", "name": "x", "steps": [ { "op": "shuffle" } ] }"#;
        assert!(PipelineSpec::from_json(json).is_err());
    }

    #[test]
    fn test_template_uses_settings() -> Result<()> {
        let settings = AppSettings {
            default_scale_range: (-1.0, 1.0),
            ..AppSettings::default()
        };
        let spec = PipelineSpec::template(&settings);
        let scale = spec.steps.iter().find_map(|s| match s {
            Step::Scale { method, .. } => Some(*method),
            _ => None,
        });
        assert_eq!(scale, Some(ScalingMethod::MinMax { range: (-1.0, 1.0) }));

        let parsed = PipelineSpec::from_json(&spec.to_json()?)?;
        assert_eq!(parsed, spec);
        Ok(())
    }

    #[test]
    fn test_step_metadata() {
        let step = Step::FillMissing {
            method: ImputeMode::Mode,
            columns: vec!["a".to_owned(), "b".to_owned()],
        };
        assert_eq!(step.op_name(), "fill_missing");
        assert_eq!(step.columns(), vec!["a", "b"]);
        assert!(!step.requires_numeric());
        assert_eq!(step.description(), "Fill missing [a, b] with mode");
    }
}
