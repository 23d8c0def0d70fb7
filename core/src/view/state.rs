use crate::pipeline::PipelineError;
use crate::prelude::Series;

/// What a view shows. Owned by the caller; backends only read it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Loading,
    Error(String),
    Empty,
    Populated(Vec<Series>),
}

impl ViewState {
    pub fn from_outcome(outcome: Result<Vec<Series>, PipelineError>) -> Self {
        match outcome {
            Err(err) => ViewState::Error(err.to_string()),
            Ok(series) if series.iter().all(|s| s.is_empty()) => ViewState::Empty,
            Ok(series) => ViewState::Populated(series),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewState::Loading => "loading",
            ViewState::Error(_) => "error",
            ViewState::Empty => "empty",
            ViewState::Populated(_) => "populated",
        }
    }

    pub fn series(&self) -> &[Series] {
        match self {
            ViewState::Populated(series) => series,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::ParseError;
    use crate::prelude::DataPoint;

    #[test]
    fn empty_series_maps_to_empty_state() {
        assert_eq!(ViewState::from_outcome(Ok(vec![])), ViewState::Empty);
        assert_eq!(
            ViewState::from_outcome(Ok(vec![Series::new("Wastage")])),
            ViewState::Empty
        );
    }

    #[test]
    fn errors_map_to_error_state_with_message() {
        let state = ViewState::from_outcome(Err(PipelineError::Parse(ParseError::MissingHeader)));
        match state {
            ViewState::Error(message) => assert!(message.contains("header")),
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn points_map_to_populated_state() {
        let series = Series::with_points("Wastage", vec![DataPoint::new(0.0, 1.0, 0)]);
        let state = ViewState::from_outcome(Ok(vec![series.clone()]));
        assert_eq!(state.label(), "populated");
        assert_eq!(state.series(), &[series]);
        assert!(ViewState::default().is_loading());
    }
}
