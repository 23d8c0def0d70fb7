use crate::ingest::columns;
use crate::prelude::{TransformError, TransformResult};
use crate::transform::sampling::Stride;
use serde::{Deserialize, Serialize};

/// Which record value becomes the x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XField {
    /// 0-based position of the record in the source file.
    RowIndex,
    /// `Detection Start time`, as Unix epoch seconds.
    DetectionStartTime,
    /// `Total detection time`, as a plain number.
    TotalDetectionTime,
}

impl XField {
    /// Source column, or `None` when x comes from the row position.
    pub fn column(&self) -> Option<&'static str> {
        match self {
            XField::RowIndex => None,
            XField::DetectionStartTime => Some(columns::DETECTION_START_TIME),
            XField::TotalDetectionTime => Some(columns::TOTAL_DETECTION_TIME),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YField {
    pub column: String,
    /// Multiplier applied after parsing, e.g. 100 when the file stores fractions.
    pub scale: f64,
}

impl Default for YField {
    fn default() -> Self {
        Self {
            column: columns::WASTAGE_PERCENTAGE.to_string(),
            scale: 1.0,
        }
    }
}

impl YField {
    pub fn scaled(scale: f64) -> Self {
        Self {
            scale,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub series_name: String,
    pub x_field: XField,
    pub y_field: YField,
    /// Keep the row at 0-based position `i` iff `i % sample_stride == 0`.
    pub sample_stride: usize,
    /// Skip rows with unparseable values; when false the first such row is an error.
    pub drop_invalid: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            series_name: "Wastage Percentage".to_string(),
            x_field: XField::RowIndex,
            y_field: YField::default(),
            sample_stride: 1,
            drop_invalid: true,
        }
    }
}

impl TransformConfig {
    pub fn new(x_field: XField, sample_stride: usize) -> Self {
        Self {
            x_field,
            sample_stride,
            ..Default::default()
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.y_field.scale = scale;
        self
    }

    pub fn with_series_name(mut self, name: impl Into<String>) -> Self {
        self.series_name = name.into();
        self
    }

    pub fn strict(mut self) -> Self {
        self.drop_invalid = false;
        self
    }

    pub fn validate(&self) -> TransformResult<Stride> {
        if !self.y_field.scale.is_finite() {
            return Err(TransformError::InvalidScale(self.y_field.scale));
        }
        Stride::new(self.sample_stride)
    }
}
