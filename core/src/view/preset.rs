use crate::transform::{TransformConfig, XField};
use crate::view::axis::{AxisConfig, AxisFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five stock wastage views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewPreset {
    Timeline,
    TimelineFull,
    TimelineZoom,
    Trend,
    Duration,
}

impl ViewPreset {
    pub const ALL: [ViewPreset; 5] = [
        ViewPreset::Timeline,
        ViewPreset::TimelineFull,
        ViewPreset::TimelineZoom,
        ViewPreset::Trend,
        ViewPreset::Duration,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ViewPreset::Timeline => "timeline",
            ViewPreset::TimelineFull => "timeline-full",
            ViewPreset::TimelineZoom => "timeline-zoom",
            ViewPreset::Trend => "trend",
            ViewPreset::Duration => "duration",
        }
    }

    fn x_field(&self) -> XField {
        match self {
            ViewPreset::Trend => XField::RowIndex,
            ViewPreset::Duration => XField::TotalDetectionTime,
            _ => XField::DetectionStartTime,
        }
    }

    fn stride(&self) -> usize {
        match self {
            ViewPreset::Timeline | ViewPreset::TimelineZoom => 20,
            ViewPreset::TimelineFull | ViewPreset::Trend => 1,
            ViewPreset::Duration => 100,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ViewPreset::Timeline => "Wastage Percentage Over Time",
            ViewPreset::TimelineFull => "Approx. Wastage Percentage Over Time",
            ViewPreset::TimelineZoom => "Approx. Wastage Percentage by Detection Start Time",
            ViewPreset::Trend => "Wastage Trend",
            ViewPreset::Duration => "Approx. Wastage Percentage Over Total Detection Time",
        }
    }

    fn series_name(&self) -> &'static str {
        match self {
            ViewPreset::Trend => "Wastage Trend",
            ViewPreset::TimelineZoom => "Approx. Wastage Percentage",
            _ => "Wastage Percentage",
        }
    }

    pub fn transform_config(&self) -> TransformConfig {
        TransformConfig::new(self.x_field(), self.stride()).with_series_name(self.series_name())
    }

    pub fn axis_config(&self) -> AxisConfig {
        let x_field = self.x_field();
        AxisConfig {
            title: self.title().into(),
            x_label: x_axis_label(x_field).into(),
            x_format: x_axis_format(x_field),
            sort_by_x: x_axis_sorted(x_field),
            ..Default::default()
        }
    }
}

pub fn x_axis_label(x_field: XField) -> &'static str {
    match x_field {
        XField::RowIndex => "Detection Order",
        XField::DetectionStartTime => "Detection Start Time",
        XField::TotalDetectionTime => "Total Detection Time",
    }
}

pub fn x_axis_format(x_field: XField) -> AxisFormat {
    match x_field {
        XField::DetectionStartTime => AxisFormat::Timestamp,
        _ => AxisFormat::Number,
    }
}

/// Durations arrive in detection order, not in x order, so their line is drawn sorted.
pub fn x_axis_sorted(x_field: XField) -> bool {
    matches!(x_field, XField::TotalDetectionTime)
}

impl fmt::Display for ViewPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ViewPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ViewPreset::ALL
            .into_iter()
            .find(|preset| preset.name() == wanted)
            .ok_or_else(|| {
                let known: Vec<_> = ViewPreset::ALL.iter().map(|p| p.name()).collect();
                format!("unknown view '{s}', expected one of {}", known.join(", "))
            })
    }
}

/// A fully resolved view: how to build the series and how to label the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSpec {
    pub name: String,
    pub transform: TransformConfig,
    pub axis: AxisConfig,
}

impl ViewSpec {
    pub fn new(name: impl Into<String>, transform: TransformConfig, axis: AxisConfig) -> Self {
        Self {
            name: name.into(),
            transform,
            axis,
        }
    }

    pub fn all_presets() -> Vec<ViewSpec> {
        ViewPreset::ALL.into_iter().map(ViewSpec::from).collect()
    }
}

impl From<ViewPreset> for ViewSpec {
    fn from(preset: ViewPreset) -> Self {
        ViewSpec::new(preset.name(), preset.transform_config(), preset.axis_config())
    }
}
