use serde::{Deserialize, Serialize};

/// Column names split by the categorical/numerical heuristic.
///
/// Both lists keep the table's column order and never share a name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPartition {
    pub numerical: Vec<String>,
    pub categorical: Vec<String>,
}

impl ColumnPartition {
    pub fn len(&self) -> usize {
        self.numerical.len() + self.categorical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numerical.is_empty() && self.categorical.is_empty()
    }

    pub fn is_numerical(&self, name: &str) -> bool {
        self.numerical.iter().any(|c| c == name)
    }

    pub fn is_categorical(&self, name: &str) -> bool {
        self.categorical.iter().any(|c| c == name)
    }
}

/// Statistic used to fill missing values.
#[derive(Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum ImputeMode {
    #[default]
    Mean,
    Median,
    /// Most frequent value; the smallest one wins a tie
    Mode,
}

impl ImputeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Mode => "mode",
        }
    }

    /// Mean and median only make sense on numeric columns.
    pub fn requires_numeric(&self) -> bool {
        matches!(self, Self::Mean | Self::Median)
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Debug)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalingMethod {
    /// `(v - mean) / std`, population standard deviation
    Standardization,
    /// Linear map of `[min, max]` onto `range`
    MinMax {
        #[serde(default = "unit_range")]
        range: (f64, f64),
    },
}

fn unit_range() -> (f64, f64) {
    (0.0, 1.0)
}

impl ScalingMethod {
    pub fn min_max() -> Self {
        Self::MinMax { range: unit_range() }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standardization => "Standardization",
            Self::MinMax { .. } => "Min-Max Scaling",
        }
    }
}

#[derive(Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum EncodingMethod {
    #[default]
    OneHot,
    Label,
}

impl EncodingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneHot => "One Hot Encoding",
            Self::Label => "Label Encoding",
        }
    }
}

#[derive(Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum OutlierMethod {
    #[default]
    Iqr,
    ZScore,
}

impl OutlierMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iqr => "IQR",
            Self::ZScore => "Z-Score",
        }
    }
}

#[derive(Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum OutlierAction {
    #[default]
    Remove,
    /// Replace flagged values with the median of the remaining values
    Transform,
}

impl OutlierAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remove => "Remove Outliers",
            Self::Transform => "Transform Outliers",
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Debug)]
#[serde(default)]
pub struct OutlierThresholds {
    pub iqr_multiplier: f64,
    pub zscore_threshold: f64,
}

impl Default for OutlierThresholds {
    fn default() -> Self {
        Self {
            iqr_multiplier: 1.5,
            zscore_threshold: 3.0,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct DatasetOverview {
    pub rows: usize,
    pub columns: usize,
    pub duplicate_rows: usize,
    pub partition: ColumnPartition,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct MissingValueSummary {
    pub column: String,
    pub missing_count: usize,
    pub missing_pct: f64,
}

/// One row of the numeric describe table.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (ddof = 1)
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Statistics shown for a single selected feature.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct FeatureStats {
    pub column: String,
    pub count: usize,
    pub missing: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ColumnTypeInfo {
    pub name: String,
    pub dtype: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct GroupMean {
    pub group: String,
    pub mean: Option<f64>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub data: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.data.get(i).and_then(|row| row.get(j)).copied()
    }
}
