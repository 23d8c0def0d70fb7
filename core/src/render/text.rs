use crate::math::StatsHelper;
use crate::prelude::{DataPoint, Series};
use crate::render::{
    error_message, line_points, ChartBackend, RenderError, EMPTY_MESSAGE, LOADING_MESSAGE,
};
use crate::view::{AxisConfig, ViewState};
use std::fmt::Write;

const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Plain-text summary with a sparkline, for terminals and logs.
#[derive(Debug, Clone, Copy)]
pub struct TextBackend {
    width: usize,
}

impl TextBackend {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
        }
    }
}

impl Default for TextBackend {
    fn default() -> Self {
        Self::new(60)
    }
}

impl ChartBackend for TextBackend {
    type Output = String;

    fn render(&mut self, state: &ViewState, axis: &AxisConfig) -> Result<String, RenderError> {
        let mut out = String::new();
        match state {
            ViewState::Loading => out.push_str(LOADING_MESSAGE),
            ViewState::Error(message) => out.push_str(&error_message(message)),
            ViewState::Empty => out.push_str(EMPTY_MESSAGE),
            ViewState::Populated(series) => self.describe(&mut out, series, axis)?,
        }
        out.push('\n');
        Ok(out)
    }
}

impl TextBackend {
    fn describe(
        &self,
        out: &mut String,
        series: &[Series],
        axis: &AxisConfig,
    ) -> Result<(), RenderError> {
        let fmt_err = |e: std::fmt::Error| RenderError::Drawing(e.to_string());
        writeln!(out, "{}", axis.title).map_err(fmt_err)?;
        write!(out, "{} vs {}", axis.y_label, axis.x_label).map_err(fmt_err)?;
        for line in series {
            write!(out, "\n{}: {} points", line.name, line.len()).map_err(fmt_err)?;
            let Some(bounds) = StatsHelper::extent(&line.points) else {
                continue;
            };
            let mean = StatsHelper::mean_y(&line.points).unwrap_or_default();
            write!(
                out,
                "\n  x {} .. {}\n  y {} .. {} (mean {})\n  {}",
                axis.format_x_over(bounds.x_min, bounds.width()),
                axis.format_x_over(bounds.x_max, bounds.width()),
                axis.format_y(bounds.y_min),
                axis.format_y(bounds.y_max),
                axis.format_y(mean),
                sparkline(&line_points(line, axis), self.width)
            )
            .map_err(fmt_err)?;
        }
        Ok(())
    }
}

/// Averages consecutive points into at most `width` buckets and maps each to a block glyph.
pub fn sparkline(points: &[DataPoint], width: usize) -> String {
    if points.is_empty() || width == 0 {
        return String::new();
    }
    let chunk = points.len().div_ceil(width);
    let buckets: Vec<f64> = points
        .chunks(chunk)
        .map(|c| c.iter().map(|p| p.y).sum::<f64>() / c.len() as f64)
        .collect();
    let min = buckets.iter().copied().fold(f64::INFINITY, f64::min);
    let max = buckets.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    buckets
        .iter()
        .map(|v| {
            if range <= f64::EPSILON {
                LEVELS[LEVELS.len() / 2]
            } else {
                let level = ((v - min) / range * (LEVELS.len() - 1) as f64).round() as usize;
                LEVELS[level.min(LEVELS.len() - 1)]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewPreset;

    #[test]
    fn sparkline_spans_lowest_to_highest_glyph() {
        let points: Vec<_> = (0..8).map(|i| DataPoint::new(i as f64, i as f64, i)).collect();
        assert_eq!(sparkline(&points, 8), "▁▂▃▄▅▆▇█");
        assert_eq!(sparkline(&points, 4).chars().count(), 4);
        assert_eq!(sparkline(&[], 10), "");
    }

    #[test]
    fn flat_series_draws_mid_level() {
        let points = vec![DataPoint::new(0.0, 3.0, 0), DataPoint::new(1.0, 3.0, 1)];
        assert_eq!(sparkline(&points, 10), "▅▅");
    }

    #[test]
    fn states_render_distinct_text() {
        let mut backend = TextBackend::default();
        let axis = AxisConfig::default();
        assert_eq!(
            backend.render(&ViewState::Loading, &axis).unwrap(),
            format!("{LOADING_MESSAGE}\n")
        );
        assert_eq!(
            backend.render(&ViewState::Empty, &axis).unwrap(),
            format!("{EMPTY_MESSAGE}\n")
        );
        assert_eq!(
            backend
                .render(&ViewState::Error("timed out".into()), &axis)
                .unwrap(),
            "Error: timed out\n"
        );
    }

    #[test]
    fn populated_summary_lists_ranges() {
        let state = ViewState::Populated(vec![Series::with_points(
            "Wastage Trend",
            vec![DataPoint::new(0.0, 50.0, 0), DataPoint::new(2.0, 25.0, 2)],
        )]);
        let text = TextBackend::new(10)
            .render(&state, &ViewPreset::Trend.axis_config())
            .unwrap();
        assert!(text.starts_with("Wastage Trend\nWastage Percentage vs Detection Order"));
        assert!(text.contains("Wastage Trend: 2 points"));
        assert!(text.contains("x 0 .. 2"));
        assert!(text.contains("y 25.00 .. 50.00 (mean 37.50)"));
    }
}
