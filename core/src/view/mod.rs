pub mod axis;
pub mod preset;
pub mod state;

pub use axis::{AxisConfig, AxisFormat};
pub use preset::{x_axis_format, x_axis_label, x_axis_sorted, ViewPreset, ViewSpec};
pub use state::ViewState;
