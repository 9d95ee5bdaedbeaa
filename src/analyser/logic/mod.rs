//! Core dataset logic: loading, classification, preprocessing transforms and
//! read-only summaries.
//!
//! Every transform takes the current table by reference and returns a new
//! [`DataFrame`](polars::prelude::DataFrame); the caller decides whether the
//! result replaces its working copy (see
//! [`EdaSession`](crate::analyser::session::EdaSession)).

pub mod analysis;
pub mod classify;
pub mod cleaning;
pub mod encoding;
pub mod io;
pub mod naming;
pub mod outliers;
pub mod scaling;
pub mod types;

pub use analysis::{
    column_types, correlation_matrix, dataset_overview, describe_numeric, feature_stats,
    group_means, missing_value_summary, search_columns, value_counts,
};
pub use classify::{DEFAULT_CATEGORY_THRESHOLD, classify, classify_with_threshold};
pub use cleaning::{drop_rows_missing_in, fill_missing, missing_count, remove_columns};
pub use encoding::{encode, label_encode, one_hot_encode};
pub use io::{IoOptions, load_df, load_df_from_reader, save_df, write_csv};
pub use outliers::{
    detect_outliers, detect_outliers_with, handle_outliers, iqr_outliers, remove_outliers,
    transform_outliers, zscore_outliers,
};
pub use scaling::{min_max_scale, scale, standard_scale};
pub use types::{
    ColumnPartition, ColumnTypeInfo, CorrelationMatrix, DatasetOverview, EncodingMethod,
    FeatureStats, GroupMean, ImputeMode, MissingValueSummary, NumericSummary, OutlierAction,
    OutlierMethod, OutlierThresholds, ScalingMethod, ValueCount,
};

#[cfg(test)]
mod tests;
