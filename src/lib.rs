//! # autoeda - exploratory data analysis and preprocessing
//!
//! autoeda loads a CSV table, sorts its columns into categorical and
//! numerical sets, summarizes them, and applies preprocessing transforms to a
//! working copy that can always be reverted to the loaded data.
//!
//! ## Quick Start
//!
//! ```no_run
//! use autoeda::analyser::EdaSession;
//! use autoeda::analyser::logic::{EncodingMethod, ImputeMode, ScalingMethod};
//! use autoeda::config::AppSettings;
//! use std::path::Path;
//!
//! let mut session = EdaSession::from_csv_path(Path::new("data.csv"), &AppSettings::default())?;
//! let partition = session.partition()?;
//!
//! session.fill_missing(&partition.numerical, ImputeMode::Median)?;
//! session.encode(&partition.categorical, EncodingMethod::OneHot)?;
//! session.scale(&partition.numerical, ScalingMethod::Standardization)?;
//! session.export_csv_to_path(Path::new("clean.csv"))?;
//!
//! session.revert();
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Core Modules
//!
//! - [`analyser`]: column classification, transforms, summaries, sessions
//!   - [`analyser::logic`]: stateless functions over a `DataFrame`
//! - [`pipeline`]: JSON pipeline specs, validation and execution
//! - [`config`]: persisted settings
//! - [`error`]: error types and handling utilities
//! - [`logging`]: tracing setup
//! - [`utils`]: formatting helpers for text output

#![warn(clippy::all, rust_2018_idioms)]

pub mod analyser;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod utils;
