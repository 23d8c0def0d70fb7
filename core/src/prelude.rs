use serde::{Deserialize, Serialize};

/// A single plotted point. `row` is the 0-based position of the source record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
    pub row: usize,
}

impl DataPoint {
    pub fn new(x: f64, y: f64, row: usize) -> Self {
        Self { x, y, row }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Named, ordered sequence of points handed to a chart backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<DataPoint>,
}

impl Series {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
        }
    }

    pub fn with_points(name: impl Into<String>, points: Vec<DataPoint>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Errors raised while turning records into a series.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("sample stride must be at least 1, got {0}")]
    InvalidStride(usize),
    #[error("scale must be a finite number, got {0}")]
    InvalidScale(f64),
    #[error("column '{0}' not present in input")]
    MissingColumn(String),
    #[error("row {row}: column '{column}' holds non-numeric value '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
}

pub type TransformResult<T> = Result<T, TransformError>;
