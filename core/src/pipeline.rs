use crate::ingest::{parse_records, FetchError, Loader, ParseError, Record, ResourceRef};
use crate::prelude::{Series, TransformError};
use crate::telemetry::LogManager;
use crate::transform::SeriesTransform;
use crate::view::{ViewSpec, ViewState};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("loading source failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("parsing source failed: {0}")]
    Parse(#[from] ParseError),
    #[error("building series failed: {0}")]
    Transform(#[from] TransformError),
}

/// Loader → parser → transform, one pass per call.
pub struct Pipeline<L> {
    loader: L,
    logger: LogManager,
}

impl<L: Loader> Pipeline<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            logger: LogManager::new("pipeline"),
        }
    }

    pub async fn load_records(&self, resource: &ResourceRef) -> Result<Vec<Record>, PipelineError> {
        self.logger.detail(&format!("fetching {resource}"));
        let text = self.loader.fetch(resource).await?;
        let records = parse_records(&text)?;
        self.logger
            .record(&format!("{} records loaded from {resource}", records.len()));
        Ok(records)
    }

    pub async fn run(&self, resource: &ResourceRef, view: &ViewSpec) -> Result<Series, PipelineError> {
        let records = self.load_records(resource).await?;
        Ok(build_series(&records, view)?)
    }

    pub async fn load_view(&self, resource: &ResourceRef, view: &ViewSpec) -> ViewState {
        let outcome = self.run(resource, view).await.map(|series| vec![series]);
        self.finish(&view.name, outcome)
    }

    /// Fetches once and builds every view from the same records.
    pub async fn load_views(&self, resource: &ResourceRef, views: &[ViewSpec]) -> Vec<ViewState> {
        match self.load_records(resource).await {
            Ok(records) => views
                .iter()
                .map(|view| {
                    let outcome = build_series(&records, view)
                        .map(|series| vec![series])
                        .map_err(PipelineError::from);
                    self.finish(&view.name, outcome)
                })
                .collect(),
            Err(err) => {
                self.logger.warn(&format!("{resource}: {err}"));
                let message = err.to_string();
                views
                    .iter()
                    .map(|_| ViewState::Error(message.clone()))
                    .collect()
            }
        }
    }

    fn finish(&self, name: &str, outcome: Result<Vec<Series>, PipelineError>) -> ViewState {
        if let Err(err) = &outcome {
            self.logger.warn(&format!("view {name}: {err}"));
        }
        let state = ViewState::from_outcome(outcome);
        self.logger.detail(&format!("view {name} -> {}", state.label()));
        state
    }
}

pub fn build_series(records: &[Record], view: &ViewSpec) -> Result<Series, TransformError> {
    SeriesTransform::new(view.transform.clone())?.execute(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{TransformConfig, XField};
    use crate::view::{AxisConfig, ViewPreset};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedLoader {
        body: Result<String, String>,
        calls: AtomicUsize,
    }

    impl FixedLoader {
        fn ok(body: &str) -> Self {
            Self {
                body: Ok(body.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                body: Err(message.to_string()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Loader for FixedLoader {
        async fn fetch(&self, resource: &ResourceRef) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.body.clone().map_err(|message| FetchError::Http {
                url: resource.to_string(),
                message,
            })
        }
    }

    const SOURCE: &str = "\
Detection Start time,Approx. Wastage Percentage,Total detection time,Alert status
t1,0.5,10,Normal
t2,abc,11,Alert
t3,0.25,12,Normal
";

    fn resource() -> ResourceRef {
        ResourceRef::Url("http://127.0.0.1:9000/milk_spillage.csv".into())
    }

    fn scaled_index_view() -> ViewSpec {
        ViewSpec::new(
            "scaled",
            TransformConfig::new(XField::RowIndex, 1).with_scale(100.0),
            AxisConfig::default(),
        )
    }

    #[tokio::test]
    async fn pipeline_drops_invalid_rows_and_scales() {
        let pipeline = Pipeline::new(FixedLoader::ok(SOURCE));
        let series = pipeline.run(&resource(), &scaled_index_view()).await.unwrap();
        let pairs: Vec<_> = series.points.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(pairs, vec![(0.0, 50.0), (2.0, 25.0)]);
    }

    #[tokio::test]
    async fn header_only_source_is_empty_not_error() {
        let pipeline = Pipeline::new(FixedLoader::ok(
            "Detection Start time,Approx. Wastage Percentage,Total detection time,Alert status\n",
        ));
        let state = pipeline.load_view(&resource(), &scaled_index_view()).await;
        assert_eq!(state, ViewState::Empty);
    }

    #[tokio::test]
    async fn fetch_failure_surfaces_message_without_series() {
        let pipeline = Pipeline::new(FixedLoader::failing("connection refused"));
        let state = pipeline.load_view(&resource(), &scaled_index_view()).await;
        match state {
            ViewState::Error(message) => assert!(message.contains("connection refused")),
            other => panic!("unexpected state {other:?}"),
        }
        assert!(matches!(
            pipeline.run(&resource(), &scaled_index_view()).await,
            Err(PipelineError::Fetch(_))
        ));
    }

    #[tokio::test]
    async fn parse_failure_is_distinct_from_fetch_failure() {
        let pipeline = Pipeline::new(FixedLoader::ok("a,b\n1,2,3\n"));
        assert!(matches!(
            pipeline.run(&resource(), &scaled_index_view()).await,
            Err(PipelineError::Parse(ParseError::Malformed { .. }))
        ));
    }

    #[tokio::test]
    async fn load_views_fetches_once_for_all_views() {
        let loader = FixedLoader::ok(SOURCE);
        let pipeline = Pipeline::new(loader);
        let views = ViewSpec::all_presets();
        let states = pipeline.load_views(&resource(), &views).await;
        assert_eq!(states.len(), views.len());
        assert_eq!(pipeline.loader.calls.load(Ordering::SeqCst), 1);

        let trend = views
            .iter()
            .position(|v| v.name == ViewPreset::Trend.name())
            .unwrap();
        assert_eq!(states[trend].series()[0].len(), 2);
        let timeline = views
            .iter()
            .position(|v| v.name == ViewPreset::Timeline.name())
            .unwrap();
        // "t1" is not a timestamp, so the timeline has nothing to draw.
        assert_eq!(states[timeline], ViewState::Empty);
    }

    #[tokio::test]
    async fn load_views_reports_fetch_error_for_every_view() {
        let pipeline = Pipeline::new(FixedLoader::failing("404"));
        let states = pipeline
            .load_views(&resource(), &ViewSpec::all_presets())
            .await;
        assert!(states.iter().all(|s| matches!(s, ViewState::Error(_))));
    }
}
