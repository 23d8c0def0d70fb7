use crate::ingest::record::Record;
use crate::ingest::value::{parse_number, parse_timestamp};
use crate::prelude::{DataPoint, Series, TransformError, TransformResult};
use crate::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};
use crate::transform::config::{TransformConfig, XField};
use crate::transform::sampling::Stride;

/// Turns records into a single plottable series.
///
/// Rows are sampled on their original position first, then x and y are read
/// from the same retained row. A row whose x or y cannot be read as a finite
/// number never produces a point.
pub struct SeriesTransform {
    config: TransformConfig,
    stride: Stride,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl SeriesTransform {
    pub fn new(config: TransformConfig) -> TransformResult<Self> {
        let stride = config.validate()?;
        Ok(Self {
            config,
            stride,
            logger: LogManager::new("transform"),
            metrics: MetricsRecorder::new(),
        })
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn execute(&self, records: &[Record]) -> TransformResult<Series> {
        self.metrics.reset();
        let mut series = Series::new(self.config.series_name.clone());
        let Some(first) = records.first() else {
            return Ok(series);
        };

        let y_column = self.config.y_field.column.as_str();
        let x_column = self.config.x_field.column();
        for column in x_column.into_iter().chain(Some(y_column)) {
            if !first.contains(column) {
                return Err(TransformError::MissingColumn(column.to_string()));
            }
        }

        for (row, record) in records.iter().enumerate() {
            self.metrics.record_seen();
            if !self.stride.keeps(row) {
                self.metrics.record_sampled_out();
                continue;
            }

            match self.read_point(row, record) {
                Ok(point) => {
                    self.metrics.record_emitted();
                    series.points.push(point);
                }
                Err(err) if self.config.drop_invalid => {
                    self.metrics.record_invalid();
                    self.logger.detail(&format!("dropping {err}"));
                }
                Err(err) => return Err(err),
            }
        }

        let snapshot = self.metrics.snapshot();
        self.logger.record(&format!(
            "{}: {} rows, {} sampled out, {} invalid, {} points",
            series.name,
            snapshot.rows_seen,
            snapshot.rows_sampled_out,
            snapshot.rows_invalid,
            snapshot.points_emitted
        ));
        Ok(series)
    }

    fn read_point(&self, row: usize, record: &Record) -> TransformResult<DataPoint> {
        let x = match self.config.x_field {
            XField::RowIndex => row as f64,
            XField::DetectionStartTime => read_cell(row, record, self.x_name(), parse_timestamp)?,
            XField::TotalDetectionTime => read_cell(row, record, self.x_name(), parse_number)?,
        };

        let y_column = self.config.y_field.column.as_str();
        let y = read_cell(row, record, y_column, parse_number)? * self.config.y_field.scale;
        if !y.is_finite() {
            return Err(invalid(row, y_column, record));
        }

        Ok(DataPoint::new(x, y, row))
    }

    fn x_name(&self) -> &'static str {
        self.config.x_field.column().unwrap_or_default()
    }
}

fn read_cell(
    row: usize,
    record: &Record,
    column: &str,
    parse: fn(&str) -> Option<f64>,
) -> TransformResult<f64> {
    record
        .get(column)
        .and_then(parse)
        .ok_or_else(|| invalid(row, column, record))
}

fn invalid(row: usize, column: &str, record: &Record) -> TransformError {
    TransformError::InvalidValue {
        row,
        column: column.to_string(),
        value: record.get(column).unwrap_or_default().to_string(),
    }
}

/// One-shot form of [`SeriesTransform`].
pub fn transform(records: &[Record], config: &TransformConfig) -> TransformResult<Series> {
    SeriesTransform::new(config.clone())?.execute(records)
}
