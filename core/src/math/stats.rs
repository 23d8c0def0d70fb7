use crate::prelude::DataPoint;

/// Axis extents covering a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    /// Widens zero-width ranges so a flat or single-point series still has an area to draw in.
    pub fn padded(mut self) -> Self {
        if self.x_max - self.x_min <= f64::EPSILON {
            let pad = (self.x_min.abs() * 0.05).max(1.0);
            self.x_min -= pad;
            self.x_max += pad;
        }
        if self.y_max - self.y_min <= f64::EPSILON {
            let pad = (self.y_min.abs() * 0.05).max(1.0);
            self.y_min -= pad;
            self.y_max += pad;
        }
        self
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

pub struct StatsHelper;

impl StatsHelper {
    pub fn extent<'a, I>(points: I) -> Option<Bounds>
    where
        I: IntoIterator<Item = &'a DataPoint>,
    {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Bounds {
                    x_min: p.x,
                    x_max: p.x,
                    y_min: p.y,
                    y_max: p.y,
                },
                Some(b) => Bounds {
                    x_min: b.x_min.min(p.x),
                    x_max: b.x_max.max(p.x),
                    y_min: b.y_min.min(p.y),
                    y_max: b.y_max.max(p.y),
                },
            })
        })
    }

    pub fn mean_y(points: &[DataPoint]) -> Option<f64> {
        if points.is_empty() {
            return None;
        }
        let sum: f64 = points.iter().map(|p| p.y).sum();
        Some(sum / points.len() as f64)
    }
}
