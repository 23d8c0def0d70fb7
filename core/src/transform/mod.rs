pub mod config;
pub mod sampling;
pub mod series;

pub use config::{TransformConfig, XField, YField};
pub use sampling::Stride;
pub use series::{transform, SeriesTransform};
