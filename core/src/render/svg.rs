use crate::math::{Bounds, StatsHelper};
use crate::prelude::Series;
use crate::render::{
    error_message, line_points, ChartBackend, RenderError, EMPTY_MESSAGE, LOADING_MESSAGE,
};
use crate::view::{AxisConfig, ViewState};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};

const PALETTE: [RGBColor; 4] = [
    RGBColor(46, 184, 227),
    RGBColor(75, 192, 192),
    RGBColor(242, 140, 51),
    RGBColor(153, 102, 255),
];

/// Renders a view into a standalone SVG document.
#[derive(Debug, Clone, Copy)]
pub struct SvgBackend {
    width: u32,
    height: u32,
}

impl SvgBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(200),
            height: height.max(150),
        }
    }
}

impl Default for SvgBackend {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

impl ChartBackend for SvgBackend {
    type Output = String;

    fn render(&mut self, state: &ViewState, axis: &AxisConfig) -> Result<String, RenderError> {
        let mut document = String::new();
        {
            let root = SVGBackend::with_string(&mut document, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;
            match state {
                ViewState::Loading => draw_message(&root, LOADING_MESSAGE, &BLACK)?,
                ViewState::Error(message) => draw_message(&root, &error_message(message), &RED)?,
                ViewState::Empty => draw_message(&root, EMPTY_MESSAGE, &BLACK)?,
                ViewState::Populated(series) => draw_series(&root, series, axis)?,
            }
            root.present().map_err(draw_err)?;
        }
        Ok(document)
    }
}

fn draw_err(err: impl std::fmt::Display) -> RenderError {
    RenderError::Drawing(err.to_string())
}

fn draw_message<DB>(
    root: &DrawingArea<DB, Shift>,
    message: &str,
    color: &RGBColor,
) -> Result<(), RenderError>
where
    DB: DrawingBackend,
{
    let (width, height) = root.dim_in_pixel();
    let approx_half_width = (message.chars().count() as i32 * 6).min(width as i32 / 2);
    let anchor = (width as i32 / 2 - approx_half_width, height as i32 / 2);
    root.draw(&Text::new(
        message.to_string(),
        anchor,
        FontDesc::new(FontFamily::SansSerif, 24.0, FontStyle::Normal).color(color),
    ))
    .map_err(draw_err)
}

fn draw_series<DB>(
    root: &DrawingArea<DB, Shift>,
    series: &[Series],
    axis: &AxisConfig,
) -> Result<(), RenderError>
where
    DB: DrawingBackend,
{
    let Some(bounds) = StatsHelper::extent(series.iter().flat_map(|s| s.points.iter()))
        .map(Bounds::padded)
    else {
        return draw_message(root, EMPTY_MESSAGE, &BLACK);
    };

    let mut chart = ChartBuilder::on(root)
        .caption(axis.title.as_str(), ("sans-serif", 22))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(bounds.x_min..bounds.x_max, bounds.y_min..bounds.y_max)
        .map_err(draw_err)?;

    let x_span = bounds.width();
    let x_formatter = |v: &f64| axis.format_x_over(*v, x_span);
    let y_formatter = |v: &f64| axis.format_y(*v);
    chart
        .configure_mesh()
        .x_desc(axis.x_label.as_str())
        .y_desc(axis.y_label.as_str())
        .x_labels(10)
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .draw()
        .map_err(draw_err)?;

    for (idx, line) in series.iter().enumerate() {
        let color = PALETTE[idx % PALETTE.len()];
        chart
            .draw_series(LineSeries::new(
                line_points(line, axis).into_iter().map(|p| (p.x, p.y)),
                color.stroke_width(2),
            ))
            .map_err(draw_err)?
            .label(line.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(draw_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::DataPoint;
    use crate::view::{ViewPreset, ViewSpec};

    fn populated() -> ViewState {
        ViewState::Populated(vec![Series::with_points(
            "Wastage Trend",
            vec![
                DataPoint::new(0.0, 50.0, 0),
                DataPoint::new(2.0, 25.0, 2),
                DataPoint::new(3.0, 40.0, 3),
            ],
        )])
    }

    #[test]
    fn populated_view_draws_title_and_line() {
        let mut backend = SvgBackend::default();
        let svg = backend
            .render(&populated(), &ViewPreset::Trend.axis_config())
            .unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Wastage Trend"));
        assert!(svg.contains("Detection Order"));
        assert!(svg.contains("<polyline"));
    }

    /// x pixel coordinates of every polyline in the document.
    fn polyline_xs(svg: &str) -> Vec<Vec<f64>> {
        svg.split("<polyline")
            .skip(1)
            .filter_map(|element| {
                let start = element.find("points=\"")? + "points=\"".len();
                let end = start + element[start..].find('"')?;
                Some(
                    element[start..end]
                        .split_whitespace()
                        .filter_map(|pair| pair.split(',').next()?.parse().ok())
                        .collect(),
                )
            })
            .collect()
    }

    #[test]
    fn duration_view_draws_non_decreasing_x() {
        let mut view = ViewSpec::from(ViewPreset::Duration);
        view.transform.sample_stride = 1;
        let state = ViewState::Populated(vec![Series::with_points(
            "Wastage Percentage",
            vec![
                DataPoint::new(12.0, 10.0, 0),
                DataPoint::new(3.0, 20.0, 1),
                DataPoint::new(9.0, 30.0, 2),
                DataPoint::new(1.0, 40.0, 3),
            ],
        )]);
        let svg = SvgBackend::default().render(&state, &view.axis).unwrap();

        let lines = polyline_xs(&svg);
        assert!(lines.iter().any(|xs| xs.len() == 4));
        for xs in &lines {
            assert!(xs.windows(2).all(|w| w[0] <= w[1]), "x went backwards: {xs:?}");
        }
    }

    #[test]
    fn multi_day_timeline_labels_carry_the_date() {
        let state = ViewState::Populated(vec![Series::with_points(
            "Wastage Percentage",
            vec![
                DataPoint::new(1_700_000_000.0, 1.0, 0),
                DataPoint::new(1_700_000_000.0 + 3.0 * 86_400.0, 2.0, 1),
            ],
        )]);
        let svg = SvgBackend::default()
            .render(&state, &ViewPreset::TimelineFull.axis_config())
            .unwrap();
        assert!(svg.contains("2023-11-1"));
    }

    #[test]
    fn each_state_renders_distinct_document() {
        let mut backend = SvgBackend::new(640, 360);
        let axis = AxisConfig::default();
        let loading = backend.render(&ViewState::Loading, &axis).unwrap();
        let empty = backend.render(&ViewState::Empty, &axis).unwrap();
        let error = backend
            .render(&ViewState::Error("connection refused".into()), &axis)
            .unwrap();
        assert!(loading.contains(LOADING_MESSAGE));
        assert!(empty.contains(EMPTY_MESSAGE));
        assert!(error.contains("Error: connection refused"));
        assert!(!error.contains("<polyline"));
    }

    #[test]
    fn populated_without_points_falls_back_to_empty_message() {
        let mut backend = SvgBackend::default();
        let svg = backend
            .render(
                &ViewState::Populated(vec![Series::new("Wastage")]),
                &AxisConfig::default(),
            )
            .unwrap();
        assert!(svg.contains(EMPTY_MESSAGE));
    }
}
