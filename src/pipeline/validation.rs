//! Pipeline specification validation.
//!
//! Walks the steps against the input schema before anything runs, tracking
//! the columns each step adds, removes or retypes. Unknown columns are
//! errors; a numeric-only step on a non-numeric column is a warning.

use super::spec::{PipelineSpec, SPEC_VERSION, Step};
use crate::analyser::logic::{EncodingMethod, ImputeMode, OutlierAction, ScalingMethod};
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Validation finding with the step it belongs to
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    pub step_index: Option<usize>,
    pub severity: Severity,
    pub message: String,
}

impl ValidationError {
    fn step(step_index: usize, message: impl Into<String>) -> Self {
        Self {
            step_index: Some(step_index),
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn step_warning(step_index: usize, message: impl Into<String>) -> Self {
        Self {
            step_index: Some(step_index),
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    fn spec(message: impl Into<String>) -> Self {
        Self {
            step_index: None,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        if let Some(idx) = self.step_index {
            write!(f, "Step {} {level}: {}", idx + 1, self.message)
        } else {
            write!(f, "Spec {level}: {}", self.message)
        }
    }
}

pub fn has_errors(findings: &[ValidationError]) -> bool {
    findings.iter().any(ValidationError::is_error)
}

/// Columns as they will look when a step runs.
///
/// One-hot encoding creates columns whose names depend on the data, so the
/// encoded column's name is remembered as a prefix and any `{prefix}_...`
/// name is accepted afterwards.
struct SimulatedSchema {
    columns: HashMap<String, DataType>,
    one_hot_prefixes: Vec<String>,
}

impl SimulatedSchema {
    fn new(schema: &Schema) -> Self {
        Self {
            columns: schema
                .iter()
                .map(|(name, dtype)| (name.to_string(), dtype.clone()))
                .collect(),
            one_hot_prefixes: Vec::new(),
        }
    }

    /// The stored name for `name`, matching exactly first and then trimmed.
    fn resolve(&self, name: &str) -> Option<String> {
        if self.columns.contains_key(name) {
            return Some(name.to_owned());
        }
        let wanted = name.trim();
        let mut trimmed: Vec<&String> = self
            .columns
            .keys()
            .filter(|n| n.trim() == wanted)
            .collect();
        trimmed.sort();
        trimmed.first().map(|n| (*n).clone())
    }

    fn is_indicator(&self, name: &str) -> bool {
        self.one_hot_prefixes
            .iter()
            .any(|p| name.strip_prefix(p.as_str()).is_some_and(|rest| rest.starts_with('_')))
    }

    /// `Some(dtype)` for a known column, `Some(Int32)` for a one-hot indicator.
    fn dtype_of(&self, name: &str) -> Option<DataType> {
        match self.resolve(name) {
            Some(actual) => self.columns.get(&actual).cloned(),
            None if self.is_indicator(name) => Some(DataType::Int32),
            None => None,
        }
    }

    fn set_dtype(&mut self, name: &str, dtype: DataType) {
        if let Some(actual) = self.resolve(name) {
            self.columns.insert(actual, dtype);
        } else if self.is_indicator(name) {
            self.columns.insert(name.to_owned(), dtype);
        }
    }

    fn remove(&mut self, name: &str) {
        if let Some(actual) = self.resolve(name) {
            self.columns.remove(&actual);
        }
    }
}

/// Validate a pipeline spec against an input schema.
///
/// Returns every finding; the pipeline may run when none is an error.
pub fn validate_pipeline(spec: &PipelineSpec, input_schema: &Schema) -> Vec<ValidationError> {
    let mut findings = Vec::new();

    if spec.version != SPEC_VERSION {
        findings.push(ValidationError::spec(format!(
            "Unsupported spec version '{}', expected '{SPEC_VERSION}'",
            spec.version
        )));
    }
    if spec.steps.is_empty() {
        findings.push(ValidationError {
            step_index: None,
            severity: Severity::Warning,
            message: "Pipeline has no steps".to_owned(),
        });
    }

    let mut schema = SimulatedSchema::new(input_schema);
    for (idx, step) in spec.steps.iter().enumerate() {
        validate_step(step, idx, &mut schema, &mut findings);
    }

    findings
}

fn validate_step(
    step: &Step,
    idx: usize,
    schema: &mut SimulatedSchema,
    findings: &mut Vec<ValidationError>,
) {
    let mut known: Vec<&str> = Vec::new();
    for name in step.columns() {
        match schema.dtype_of(name) {
            Some(dtype) => {
                if step.requires_numeric() && !dtype.is_numeric() {
                    findings.push(ValidationError::step_warning(
                        idx,
                        format!(
                            "Column '{name}' has type {dtype} but {} expects numeric data",
                            step.op_name()
                        ),
                    ));
                }
                known.push(name);
            }
            None => findings.push(ValidationError::step(
                idx,
                format!("Cannot {} non-existent column '{name}'", verb(step)),
            )),
        }
    }

    match step {
        Step::DropColumns { .. } => {
            for name in known {
                schema.remove(name);
            }
        }

        Step::DropMissingRows { .. } => {}

        Step::FillMissing { method, .. } => {
            if matches!(method, ImputeMode::Mean | ImputeMode::Median) {
                for name in known {
                    if schema.dtype_of(name).is_some_and(|d| d.is_integer()) {
                        schema.set_dtype(name, DataType::Float64);
                    }
                }
            }
        }

        Step::Encode { method, .. } => match method {
            EncodingMethod::OneHot => {
                for name in known {
                    let prefix = schema.resolve(name).unwrap_or_else(|| name.to_owned());
                    schema.remove(name);
                    schema.one_hot_prefixes.push(prefix);
                }
            }
            EncodingMethod::Label => {
                for name in known {
                    schema.set_dtype(name, DataType::Int64);
                }
            }
        },

        Step::Scale { method, .. } => {
            if let ScalingMethod::MinMax { range: (lo, hi) } = method {
                if !lo.is_finite() || !hi.is_finite() {
                    findings.push(ValidationError::step(
                        idx,
                        format!("Scaling range ({lo}, {hi}) must be finite"),
                    ));
                } else if lo >= hi {
                    findings.push(ValidationError::step_warning(
                        idx,
                        format!("Scaling range ({lo}, {hi}) is empty or reversed"),
                    ));
                }
            }
            for name in known {
                schema.set_dtype(name, DataType::Float64);
            }
        }

        Step::Outliers {
            action, thresholds, ..
        } => {
            if let Some(t) = thresholds
                && (t.iqr_multiplier <= 0.0 || t.zscore_threshold <= 0.0)
            {
                findings.push(ValidationError::step(
                    idx,
                    "Outlier thresholds must be positive".to_owned(),
                ));
            }
            if *action == OutlierAction::Transform {
                for name in known {
                    schema.set_dtype(name, DataType::Float64);
                }
            }
        }
    }
}

fn verb(step: &Step) -> &'static str {
    match step {
        Step::DropColumns { .. } => "drop",
        Step::DropMissingRows { .. } => "check missing values in",
        Step::FillMissing { .. } => "fill",
        Step::Encode { .. } => "encode",
        Step::Scale { .. } => "scale",
        Step::Outliers { .. } => "handle outliers in",
    }
}
