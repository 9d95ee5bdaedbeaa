//! Declarative preprocessing pipelines.
//!
//! The transforms a user applies one at a time in a session can be written
//! down as a versioned JSON "pipeline spec" and replayed headlessly from the
//! CLI.
//!
//! # Steps
//!
//! - **Columns**: `drop_columns`
//! - **Missing values**: `drop_missing_rows`, `fill_missing` (mean/median/mode)
//! - **Encoding**: `encode` (one-hot or label)
//! - **Scaling**: `scale` (standardization or min-max)
//! - **Outliers**: `outliers` (IQR or z-score, then remove or transform)
//!
//! # Example
//!
//! ```no_run
//! use autoeda::config::AppSettings;
//! use autoeda::pipeline::{PipelineSpec, Step, run_pipeline};
//! use std::path::Path;
//!
//! let spec = PipelineSpec::new("Drop ids").with_step(Step::DropColumns {
//!     columns: vec!["id".to_owned()],
//! });
//!
//! let report = run_pipeline(
//!     &spec,
//!     Path::new("data.csv"),
//!     Some(Path::new("clean.csv")),
//!     &AppSettings::default(),
//! )?;
//! println!("{}", report.summary());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod executor;
pub mod spec;
pub mod validation;

pub use executor::{RunReport, run_pipeline, run_pipeline_on_session};
pub use spec::{PipelineSpec, SPEC_VERSION, Step};
pub use validation::{Severity, ValidationError, has_errors, validate_pipeline};
