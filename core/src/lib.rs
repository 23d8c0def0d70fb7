//! Core data path for the milk-spillage wastage charts.
//!
//! Raw delimited text is loaded from a static resource, parsed into ordered
//! records, reduced to plottable series by a single parameterised transform
//! and handed to interchangeable chart backends.

pub mod ingest;
pub mod math;
pub mod pipeline;
pub mod prelude;
pub mod render;
pub mod telemetry;
pub mod transform;
pub mod view;

pub use pipeline::{Pipeline, PipelineError};
pub use prelude::{DataPoint, Series};
