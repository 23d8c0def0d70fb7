use crate::ingest::value::format_timestamp;
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// How x tick values are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisFormat {
    #[default]
    Number,
    /// Unix epoch seconds shown as wall-clock time.
    Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisConfig {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_format: AxisFormat,
    pub y_precision: usize,
    /// Join points in ascending x instead of source order.
    pub sort_by_x: bool,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            title: "Wastage Percentage".into(),
            x_label: "Detection Order".into(),
            y_label: "Wastage Percentage".into(),
            x_format: AxisFormat::Number,
            y_precision: 2,
            sort_by_x: false,
        }
    }
}

impl AxisConfig {
    pub fn format_x(&self, value: f64) -> String {
        match self.x_format {
            AxisFormat::Number => {
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    format!("{value:.0}")
                } else {
                    format!("{value:.2}")
                }
            }
            AxisFormat::Timestamp => format_timestamp(value, "%H:%M:%S"),
        }
    }

    /// Tick label for an axis covering `span` units; timestamps gain the date past one day.
    pub fn format_x_over(&self, value: f64, span: f64) -> String {
        match self.x_format {
            AxisFormat::Timestamp if span > SECONDS_PER_DAY => {
                format_timestamp(value, "%Y-%m-%d %H:%M")
            }
            _ => self.format_x(value),
        }
    }

    pub fn format_y(&self, value: f64) -> String {
        format!("{:.*}", self.y_precision, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_axis_drops_trailing_zeros_for_whole_values() {
        let axis = AxisConfig::default();
        assert_eq!(axis.format_x(20.0), "20");
        assert_eq!(axis.format_x(12.345), "12.35");
        assert_eq!(axis.format_y(0.5), "0.50");
    }

    #[test]
    fn timestamp_axis_prints_wall_clock() {
        let axis = AxisConfig {
            x_format: AxisFormat::Timestamp,
            ..Default::default()
        };
        assert_eq!(axis.format_x(1_700_000_000.0), "22:13:20");
        assert_eq!(axis.format_x_over(1_700_000_000.0, 3_600.0), "22:13:20");
    }

    #[test]
    fn timestamp_ticks_show_date_beyond_one_day() {
        let axis = AxisConfig {
            x_format: AxisFormat::Timestamp,
            ..Default::default()
        };
        assert_eq!(
            axis.format_x_over(1_700_000_000.0, 2.0 * SECONDS_PER_DAY),
            "2023-11-14 22:13"
        );
        assert_eq!(
            axis.format_x_over(1_700_000_000.0 + SECONDS_PER_DAY, 2.0 * SECONDS_PER_DAY),
            "2023-11-15 22:13"
        );
        assert_eq!(AxisConfig::default().format_x_over(20.0, 1.0e6), "20");
    }
}
