//! Pipeline execution engine.
//!
//! Runs a validated spec step by step through an [`EdaSession`], so a file
//! replay and the interactive transforms share one code path.

use super::spec::PipelineSpec;
use super::validation::{has_errors, validate_pipeline};
use crate::analyser::EdaSession;
use crate::config::AppSettings;
use crate::error::EdaError;
use anyhow::{Context as _, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::Path;

/// Report generated after pipeline execution
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub rows_before: usize,
    pub columns_before: usize,
    pub rows_after: usize,
    pub columns_after: usize,

    /// Number of steps successfully applied
    pub steps_applied: usize,

    /// Validation warnings and skipped steps
    pub warnings: Vec<String>,

    pub duration: std::time::Duration,
    pub finished_at: DateTime<Local>,
}

impl RunReport {
    pub fn summary(&self) -> String {
        format!(
            "Pipeline completed: {} rows ({} → {}), {} columns ({} → {}), {} steps, {:.2}s",
            change(self.rows_before, self.rows_after),
            self.rows_before,
            self.rows_after,
            change(self.columns_before, self.columns_after),
            self.columns_before,
            self.columns_after,
            self.steps_applied,
            self.duration.as_secs_f64()
        )
    }
}

fn change(before: usize, after: usize) -> &'static str {
    if after > before {
        "added"
    } else if after < before {
        "removed"
    } else {
        "unchanged"
    }
}

/// Load `input_path`, run `spec` on it and write the result when `output_path` is given.
pub fn run_pipeline(
    spec: &PipelineSpec,
    input_path: &Path,
    output_path: Option<&Path>,
    settings: &AppSettings,
) -> Result<RunReport> {
    let mut session =
        EdaSession::from_csv_path(input_path, settings).context("Failed to load input file")?;
    let report = run_pipeline_on_session(spec, &mut session)?;

    if let Some(path) = output_path {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
        session.export_csv_to_path(path)?;
    }

    Ok(report)
}

/// Validate `spec` against the session's working copy and apply its steps in order.
///
/// A failing step is skipped with a warning unless the spec sets
/// `stop_on_error`, in which case the error is returned and the steps applied
/// so far stay applied.
pub fn run_pipeline_on_session(spec: &PipelineSpec, session: &mut EdaSession) -> Result<RunReport> {
    let start = std::time::Instant::now();
    let rows_before = session.working().height();
    let columns_before = session.working().width();

    let schema = session.working().schema().clone();
    let findings = validate_pipeline(spec, &schema);
    if has_errors(&findings) {
        return Err(EdaError::Pipeline(format!(
            "validation failed:\n{}",
            findings
                .iter()
                .filter(|f| f.is_error())
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n")
        ))
        .into());
    }
    let mut warnings: Vec<String> = findings.iter().map(ToString::to_string).collect();

    tracing::info!("Running pipeline '{}' ({} steps)", spec.name, spec.steps.len());
    let mut steps_applied = 0;
    for (idx, step) in spec.steps.iter().enumerate() {
        match session.apply(step) {
            Ok(_) => steps_applied += 1,
            Err(e) if spec.stop_on_error => {
                return Err(e.context(format!("Step {} ({}) failed", idx + 1, step.op_name())));
            }
            Err(e) => {
                warnings.push(format!("Step {}: {e:#} (skipped)", idx + 1));
            }
        }
    }

    let report = RunReport {
        rows_before,
        columns_before,
        rows_after: session.working().height(),
        columns_after: session.working().width(),
        steps_applied,
        warnings,
        duration: start.elapsed(),
        finished_at: Local::now(),
    };
    tracing::info!("{}", report.summary());
    Ok(report)
}
