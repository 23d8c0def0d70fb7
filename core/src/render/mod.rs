//! Chart backends. Each one turns a [`ViewState`] into its own output type and
//! must render all four states distinctly.

pub mod svg;
pub mod text;

pub use svg::SvgBackend;
pub use text::TextBackend;

use crate::prelude::{DataPoint, Series};
use crate::view::{AxisConfig, ViewState};
use thiserror::Error;

pub const LOADING_MESSAGE: &str = "Loading data...";
pub const EMPTY_MESSAGE: &str = "No data available to display";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("drawing chart failed: {0}")]
    Drawing(String),
}

pub trait ChartBackend {
    type Output;

    fn render(&mut self, state: &ViewState, axis: &AxisConfig) -> Result<Self::Output, RenderError>;
}

pub fn error_message(message: &str) -> String {
    format!("Error: {message}")
}

/// Points in the order the line visits them. The series itself keeps source order.
pub fn line_points(series: &Series, axis: &AxisConfig) -> Vec<DataPoint> {
    let mut points = series.points.clone();
    if axis.sort_by_x {
        points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.row.cmp(&b.row)));
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::columns::{
        ALERT_STATUS, DETECTION_START_TIME, TOTAL_DETECTION_TIME, WASTAGE_PERCENTAGE,
    };
    use crate::ingest::Record;
    use crate::pipeline::build_series;
    use crate::view::{ViewPreset, ViewSpec};

    fn duration_rows(totals: &[&str]) -> Vec<Record> {
        totals
            .iter()
            .enumerate()
            .map(|(i, total)| {
                let wastage = format!("{}", i + 1);
                Record::from([
                    (DETECTION_START_TIME, "2024-01-01 00:00:00"),
                    (WASTAGE_PERCENTAGE, wastage.as_str()),
                    (TOTAL_DETECTION_TIME, *total),
                    (ALERT_STATUS, "Normal"),
                ])
            })
            .collect()
    }

    fn dense_duration_view() -> ViewSpec {
        let mut view = ViewSpec::from(ViewPreset::Duration);
        view.transform.sample_stride = 1;
        view
    }

    #[test]
    fn duration_line_is_drawn_in_ascending_x() {
        let view = dense_duration_view();
        let series = build_series(&duration_rows(&["12", "3", "9", "1"]), &view).unwrap();

        let source: Vec<_> = series.points.iter().map(|p| p.x).collect();
        assert_eq!(source, vec![12.0, 3.0, 9.0, 1.0]);

        let drawn = line_points(&series, &view.axis);
        let xs: Vec<_> = drawn.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1.0, 3.0, 9.0, 12.0]);
        let rows: Vec<_> = drawn.iter().map(|p| p.row).collect();
        assert_eq!(rows, vec![3, 1, 2, 0]);
    }

    #[test]
    fn equal_durations_keep_source_order() {
        let view = dense_duration_view();
        let series = build_series(&duration_rows(&["5", "2", "5"]), &view).unwrap();
        let rows: Vec<_> = line_points(&series, &view.axis)
            .iter()
            .map(|p| p.row)
            .collect();
        assert_eq!(rows, vec![1, 0, 2]);
    }

    #[test]
    fn ordered_axes_keep_source_order() {
        let series = Series::with_points(
            "Wastage Trend",
            vec![DataPoint::new(0.0, 5.0, 0), DataPoint::new(1.0, 2.0, 1)],
        );
        let drawn = line_points(&series, &ViewPreset::Trend.axis_config());
        assert_eq!(drawn, series.points);
    }
}
