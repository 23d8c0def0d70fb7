use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use clap::ValueEnum;
use serde::Serialize;
use spillcore::ingest::{ResourceRef, StaticLoader};
use spillcore::render::{ChartBackend, SvgBackend, TextBackend};
use spillcore::view::{AxisConfig, ViewSpec, ViewState};
use spillcore::{Pipeline, Series};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Svg,
    Text,
    Json,
}

impl OutputFormat {
    fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        }
    }
}

/// Outcome of one rendered view.
pub struct ViewReport {
    pub name: String,
    pub state: &'static str,
    pub points: usize,
    pub path: PathBuf,
}

#[derive(Serialize)]
struct ViewDump<'a> {
    name: &'a str,
    state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    axis: &'a AxisConfig,
    series: &'a [Series],
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub async fn execute(
        &self,
        resource: &ResourceRef,
        out_dir: &Path,
        format: OutputFormat,
    ) -> anyhow::Result<Vec<ViewReport>> {
        let views = self.config.resolve_views()?;
        let loader = StaticLoader::new(self.config.timeout()).context("creating loader")?;
        let pipeline = Pipeline::new(loader);
        let states = pipeline.load_views(resource, &views).await;

        fs::create_dir_all(out_dir)
            .with_context(|| format!("creating output directory {}", out_dir.display()))?;

        views
            .iter()
            .zip(states.iter())
            .map(|(view, state)| write_view(view, state, out_dir, format))
            .collect()
    }
}

fn write_view(
    view: &ViewSpec,
    state: &ViewState,
    out_dir: &Path,
    format: OutputFormat,
) -> anyhow::Result<ViewReport> {
    let contents = match format {
        OutputFormat::Svg => SvgBackend::default().render(state, &view.axis)?,
        OutputFormat::Text => TextBackend::default().render(state, &view.axis)?,
        OutputFormat::Json => {
            let error = match state {
                ViewState::Error(message) => Some(message.as_str()),
                _ => None,
            };
            serde_json::to_string_pretty(&ViewDump {
                name: &view.name,
                state: state.label(),
                error,
                axis: &view.axis,
                series: state.series(),
            })
            .with_context(|| format!("serializing view {}", view.name))?
        }
    };

    let path = out_dir.join(format!("{}.{}", view.name, format.extension()));
    fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;

    Ok(ViewReport {
        name: view.name.clone(),
        state: state.label(),
        points: state.series().iter().map(Series::len).sum(),
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::spillage::{build_spillage_csv, GeneratorConfig};
    use spillcore::view::ViewPreset;
    use tempfile::tempdir;

    fn write_source(dir: &Path, rows: usize) -> ResourceRef {
        let config = GeneratorConfig {
            rows,
            invalid_every: 7,
            ..Default::default()
        };
        let path = dir.join("milk_spillage.csv");
        fs::write(&path, build_spillage_csv(&config).unwrap()).unwrap();
        ResourceRef::Path(path)
    }

    #[tokio::test]
    async fn runner_writes_one_chart_per_view() {
        let dir = tempdir().unwrap();
        let resource = write_source(dir.path(), 400);
        let out_dir = dir.path().join("charts");
        let runner = Runner::new(WorkflowConfig::from_args(None, 5, &[]));

        let reports = runner
            .execute(&resource, &out_dir, OutputFormat::Svg)
            .await
            .unwrap();
        assert_eq!(reports.len(), ViewPreset::ALL.len());
        for report in &reports {
            assert_eq!(report.state, "populated");
            assert!(report.path.exists());
        }

        let trend = reports.iter().find(|r| r.name == "trend").unwrap();
        // 400 rows, every 7th corrupt.
        assert_eq!(trend.points, 400 - 400 / 7);
        // Stride 100 keeps rows 0, 100, 200, 300; row 300 is corrupt.
        let duration = reports.iter().find(|r| r.name == "duration").unwrap();
        assert_eq!(duration.points, 3);
    }

    #[tokio::test]
    async fn missing_source_produces_error_state_files() {
        let dir = tempdir().unwrap();
        let resource = ResourceRef::Path(dir.path().join("absent.csv"));
        let runner = Runner::new(WorkflowConfig::from_args(None, 5, &[ViewPreset::Trend]));

        let reports = runner
            .execute(&resource, dir.path(), OutputFormat::Json)
            .await
            .unwrap();
        assert_eq!(reports[0].state, "error");
        let dumped = fs::read_to_string(&reports[0].path).unwrap();
        assert!(dumped.contains("\"error\""));
        assert!(dumped.contains("absent.csv"));
    }
}
