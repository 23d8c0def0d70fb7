use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use spillcore::ingest::columns;
use spillcore::transform::{TransformConfig, XField, YField};
use spillcore::view::{
    x_axis_format, x_axis_label, x_axis_sorted, AxisConfig, ViewPreset, ViewSpec,
};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path};
use std::time::Duration;

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Views to build; empty means every preset.
    #[serde(default)]
    pub views: Vec<ViewEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ViewEntry {
    Preset { preset: ViewPreset },
    Custom(CustomView),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CustomView {
    pub name: String,
    pub x_field: XField,
    #[serde(default = "CustomView::default_stride")]
    pub sample_stride: usize,
    #[serde(default = "CustomView::default_scale")]
    pub scale: f64,
    #[serde(default = "CustomView::default_drop_invalid")]
    pub drop_invalid: bool,
    #[serde(default)]
    pub y_column: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl CustomView {
    fn default_stride() -> usize {
        1
    }

    fn default_scale() -> f64 {
        1.0
    }

    fn default_drop_invalid() -> bool {
        true
    }

    fn to_view_spec(&self) -> ViewSpec {
        let transform = TransformConfig {
            series_name: self.name.clone(),
            x_field: self.x_field,
            y_field: YField {
                column: self
                    .y_column
                    .clone()
                    .unwrap_or_else(|| columns::WASTAGE_PERCENTAGE.to_string()),
                scale: self.scale,
            },
            sample_stride: self.sample_stride,
            drop_invalid: self.drop_invalid,
        };
        let axis = AxisConfig {
            title: self.title.clone().unwrap_or_else(|| self.name.clone()),
            x_label: x_axis_label(self.x_field).into(),
            x_format: x_axis_format(self.x_field),
            sort_by_x: x_axis_sorted(self.x_field),
            ..Default::default()
        };
        ViewSpec::new(self.name.clone(), transform, axis)
    }
}

impl ViewEntry {
    pub fn to_view_spec(&self) -> ViewSpec {
        match self {
            ViewEntry::Preset { preset } => ViewSpec::from(*preset),
            ViewEntry::Custom(custom) => custom.to_view_spec(),
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self::from_args(None, default_timeout_secs(), &[])
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(source: Option<String>, timeout_secs: u64, presets: &[ViewPreset]) -> Self {
        Self {
            source,
            timeout_secs,
            views: presets
                .iter()
                .map(|preset| ViewEntry::Preset { preset: *preset })
                .collect(),
        }
    }

    /// Command-line values win over the file; empty `presets` keeps the file's views.
    pub fn apply_overrides(
        &mut self,
        source: Option<String>,
        timeout_secs: Option<u64>,
        presets: &[ViewPreset],
    ) {
        if source.is_some() {
            self.source = source;
        }
        if let Some(secs) = timeout_secs {
            self.timeout_secs = secs;
        }
        if !presets.is_empty() {
            self.views = Self::from_args(None, self.timeout_secs, presets).views;
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Resolves and validates every view, falling back to all presets.
    pub fn resolve_views(&self) -> anyhow::Result<Vec<ViewSpec>> {
        let views = if self.views.is_empty() {
            ViewSpec::all_presets()
        } else {
            self.views.iter().map(ViewEntry::to_view_spec).collect()
        };
        let mut names = HashSet::new();
        for view in &views {
            ensure_file_name(&view.name)?;
            if !names.insert(view.name.as_str()) {
                bail!("view name '{}' is used more than once", view.name);
            }
            view.transform
                .validate()
                .with_context(|| format!("invalid view '{}'", view.name))?;
        }
        Ok(views)
    }
}

/// View names become output file stems, so each must be a single plain path component.
fn ensure_file_name(name: &str) -> anyhow::Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name && !name.contains('\\') => {
            Ok(())
        }
        _ => bail!("view name '{name}' cannot be used as a file name"),
    }
}
