use crate::Message;
use iced::{
    mouse,
    widget::canvas::{self, Frame, Geometry, Path, Stroke},
    Color, Pixels, Point, Rectangle, Renderer, Size, Theme,
};
use spillcore::math::{Bounds, StatsHelper};
use spillcore::render::line_points;
use spillcore::view::AxisConfig;
use spillcore::Series;

const SERIES_COLORS: [Color; 3] = [
    Color::from_rgb(0.18, 0.72, 0.89),
    Color::from_rgb(0.29, 0.75, 0.75),
    Color::from_rgb(0.95, 0.55, 0.2),
];

const MARGIN_LEFT: f32 = 70.0;
const MARGIN_RIGHT: f32 = 20.0;
const MARGIN_TOP: f32 = 16.0;
const MARGIN_BOTTOM: f32 = 44.0;
const TICKS: usize = 5;

/// Each wheel notch keeps this share of the visible width.
const WHEEL_STEP: f64 = 0.8;
/// Narrowest zoom, as a share of the full x extent.
const MIN_ZOOM_SHARE: f64 = 1e-3;
/// Drags shorter than this are clicks, not selections.
const MIN_DRAG_PX: f32 = 4.0;
const PIXELS_PER_LINE: f32 = 40.0;

/// Visible x interval of a zoomed chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XRange {
    pub min: f64,
    pub max: f64,
}

impl XRange {
    pub fn between(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn of(bounds: &Bounds) -> Self {
        Self::between(bounds.x_min, bounds.x_max)
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }

    /// Scales the range by `factor` keeping `anchor` at the same relative position, clamped to `full`.
    pub fn zoomed(self, anchor: f64, factor: f64, full: XRange) -> XRange {
        let width = (self.width() * factor)
            .max(full.width() * MIN_ZOOM_SHARE)
            .min(full.width());
        let share = if self.width() > 0.0 {
            ((anchor - self.min) / self.width()).clamp(0.0, 1.0)
        } else {
            0.5
        };
        let min = (anchor - width * share).min(full.max - width).max(full.min);
        XRange {
            min,
            max: min + width,
        }
    }

    /// Intersection with `full`, or `None` when the selection is too thin to show.
    pub fn within(self, full: XRange) -> Option<XRange> {
        let clipped = XRange {
            min: self.min.max(full.min),
            max: self.max.min(full.max),
        };
        (clipped.width() >= full.width() * MIN_ZOOM_SHARE).then_some(clipped)
    }
}

/// Inner rectangle left for the plot once axis label margins are removed.
pub fn plot_area(size: Size) -> Rectangle {
    Rectangle {
        x: MARGIN_LEFT,
        y: MARGIN_TOP,
        width: (size.width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
        height: (size.height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
    }
}

/// Maps data coordinates into the plot area, y growing upwards.
pub fn project(x: f64, y: f64, bounds: &Bounds, area: &Rectangle) -> Point {
    let nx = ((x - bounds.x_min) / bounds.width()) as f32;
    let ny = ((y - bounds.y_min) / bounds.height()) as f32;
    Point::new(
        area.x + nx * area.width,
        area.y + area.height - ny * area.height,
    )
}

/// Data x under a horizontal pixel position.
pub fn unproject_x(px: f32, bounds: &Bounds, area: &Rectangle) -> f64 {
    let nx = f64::from((px - area.x) / area.width);
    bounds.x_min + nx * bounds.width()
}

/// Axis extents for the visible x range; y is refitted to the points inside it.
pub fn visible_bounds(series: &[Series], zoom: Option<XRange>) -> Option<Bounds> {
    let all = || series.iter().flat_map(|s| s.points.iter());
    let full = StatsHelper::extent(all())?.padded();
    let Some(range) = zoom.and_then(|r| r.within(XRange::of(&full))) else {
        return Some(full);
    };
    let (y_min, y_max) = match StatsHelper::extent(all().filter(|p| range.contains(p.x))) {
        Some(inside) => (inside.y_min, inside.y_max),
        None => (full.y_min, full.y_max),
    };
    Some(
        Bounds {
            x_min: range.min,
            x_max: range.max,
            y_min,
            y_max,
        }
        .padded(),
    )
}

/// Pointer bookkeeping for an in-progress drag selection.
#[derive(Debug, Default)]
pub struct DragState {
    anchor: Option<Point>,
}

pub struct LineChart {
    series: Vec<Series>,
    axis: AxisConfig,
    full: Option<Bounds>,
    bounds: Option<Bounds>,
}

impl LineChart {
    pub fn new(series: &[Series], axis: &AxisConfig, zoom: Option<XRange>) -> Self {
        let ordered = series
            .iter()
            .map(|s| Series::with_points(s.name.clone(), line_points(s, axis)))
            .collect();
        Self {
            series: ordered,
            axis: axis.clone(),
            full: StatsHelper::extent(series.iter().flat_map(|s| s.points.iter()))
                .map(Bounds::padded),
            bounds: visible_bounds(series, zoom),
        }
    }

    fn label(&self, frame: &mut Frame, content: String, position: Point) {
        frame.fill_text(canvas::Text {
            content,
            position,
            color: Color::from_rgb(0.7, 0.7, 0.75),
            size: Pixels(11.0),
            ..canvas::Text::default()
        });
    }

    fn selection(&self, anchor: Point, at: Point, area: &Rectangle) -> Option<XRange> {
        let (full, visible) = (self.full?, self.bounds?);
        if (at.x - anchor.x).abs() < MIN_DRAG_PX {
            return None;
        }
        XRange::between(
            unproject_x(anchor.x, &visible, area),
            unproject_x(at.x, &visible, area),
        )
        .within(XRange::of(&full))
    }
}

impl canvas::Program<Message> for LineChart {
    type State = DragState;

    fn update(
        &self,
        state: &mut Self::State,
        event: &canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let (full, visible) = (self.full?, self.bounds?);
        let area = plot_area(bounds.size());
        let canvas::Event::Mouse(event) = event else {
            return None;
        };

        match event {
            mouse::Event::WheelScrolled { delta } => {
                let position = cursor.position_in(bounds)?;
                let lines = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => *y,
                    mouse::ScrollDelta::Pixels { y, .. } => *y / PIXELS_PER_LINE,
                };
                if lines == 0.0 {
                    return None;
                }
                let anchor = unproject_x(position.x, &visible, &area);
                let next = XRange::of(&visible).zoomed(
                    anchor,
                    WHEEL_STEP.powf(f64::from(lines)),
                    XRange::of(&full),
                );
                Some(canvas::Action::publish(Message::Zoom(Some(next))).and_capture())
            }
            mouse::Event::ButtonPressed(mouse::Button::Left) => {
                state.anchor = Some(cursor.position_in(bounds)?);
                Some(canvas::Action::capture())
            }
            mouse::Event::CursorMoved { .. } if state.anchor.is_some() => {
                Some(canvas::Action::request_redraw())
            }
            mouse::Event::ButtonReleased(mouse::Button::Left) => {
                let anchor = state.anchor.take()?;
                let at = cursor.position_in(bounds).unwrap_or(anchor);
                match self.selection(anchor, at, &area) {
                    Some(range) => {
                        Some(canvas::Action::publish(Message::Zoom(Some(range))).and_capture())
                    }
                    None => Some(canvas::Action::request_redraw()),
                }
            }
            mouse::Event::ButtonPressed(mouse::Button::Right) => {
                state.anchor = None;
                Some(canvas::Action::publish(Message::Zoom(None)).and_capture())
            }
            _ => None,
        }
    }

    fn draw(
        &self,
        state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.05, 0.05, 0.05),
        );

        let Some(extent) = self.bounds else {
            return vec![frame.into_geometry()];
        };
        let area = plot_area(bounds.size());

        let grid = Path::new(|builder| {
            for tick in 0..=TICKS {
                let t = tick as f32 / TICKS as f32;
                let y = area.y + area.height * t;
                builder.move_to(Point::new(area.x, y));
                builder.line_to(Point::new(area.x + area.width, y));
                let x = area.x + area.width * t;
                builder.move_to(Point::new(x, area.y));
                builder.line_to(Point::new(x, area.y + area.height));
            }
        });
        frame.stroke(
            &grid,
            Stroke::default()
                .with_width(1.0)
                .with_color(Color::from_rgb(0.2, 0.2, 0.25)),
        );

        for tick in 0..=TICKS {
            let t = tick as f64 / TICKS as f64;
            let y_value = extent.y_max - extent.height() * t;
            let y_pos = area.y + area.height * t as f32;
            self.label(
                &mut frame,
                self.axis.format_y(y_value),
                Point::new(6.0, y_pos - 6.0),
            );
            let x_value = extent.x_min + extent.width() * t;
            let x_pos = area.x + area.width * t as f32;
            self.label(
                &mut frame,
                self.axis.format_x_over(x_value, extent.width()),
                Point::new(x_pos - 18.0, area.y + area.height + 6.0),
            );
        }
        self.label(
            &mut frame,
            self.axis.x_label.clone(),
            Point::new(area.x + area.width / 2.0 - 40.0, bounds.height - 16.0),
        );

        // Inside the clip the origin sits at the plot area's corner.
        let local = Rectangle::new(Point::ORIGIN, area.size());
        frame.with_clip(area, |plot| {
            for (idx, line) in self.series.iter().enumerate() {
                if line.points.len() < 2 {
                    continue;
                }
                let path = Path::new(|builder| {
                    for (i, point) in line.points.iter().enumerate() {
                        let p = project(point.x, point.y, &extent, &local);
                        if i == 0 {
                            builder.move_to(p);
                        } else {
                            builder.line_to(p);
                        }
                    }
                });
                plot.stroke(
                    &path,
                    Stroke::default()
                        .with_width(2.0)
                        .with_color(SERIES_COLORS[idx % SERIES_COLORS.len()]),
                );
            }
        });

        if let (Some(anchor), Some(at)) = (state.anchor, cursor.position_in(bounds)) {
            let left = anchor.x.min(at.x).max(area.x);
            let right = anchor.x.max(at.x).min(area.x + area.width);
            if right > left {
                frame.fill_rectangle(
                    Point::new(left, area.y),
                    Size::new(right - left, area.height),
                    Color::from_rgba(0.95, 0.55, 0.2, 0.2),
                );
            }
        } else if let Some(hover) = cursor.position_in(bounds) {
            let nearest = self
                .series
                .iter()
                .flat_map(|s| s.points.iter())
                .filter(|p| p.x >= extent.x_min && p.x <= extent.x_max)
                .map(|p| (p, project(p.x, p.y, &extent, &area)))
                .min_by(|(_, a), (_, b)| (a.x - hover.x).abs().total_cmp(&(b.x - hover.x).abs()));
            if let Some((point, at)) = nearest {
                let marker = Path::new(|builder| builder.circle(at, 4.0));
                frame.fill(&marker, Color::from_rgb(0.95, 0.55, 0.2));
                self.label(
                    &mut frame,
                    format!(
                        "row {} | {} | {} %",
                        point.row,
                        self.axis.format_x_over(point.x, extent.width()),
                        self.axis.format_y(point.y)
                    ),
                    Point::new(area.x + 8.0, area.y + 4.0),
                );
            }
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if self.bounds.is_some() && cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}
