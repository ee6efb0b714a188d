//! Page tiling module
//!
//! Sliding windows, square resizing and multi-scale pyramids, plus a
//! pipeline that chains them over a batch of pages.

pub mod pipeline;
pub mod steps;

pub use pipeline::{Pipeline, PipelineResult, Stage, StepTiming};
pub use steps::grayscale::{to_grayscale, to_grayscale_all};
pub use steps::pyramid::{pyramids, pyramids_all, PyramidSpec, DEFAULT_STEP_DIVISOR};
pub use steps::resize::{resize, resize_all, Resampling};
pub use steps::rotate::{rotate_clockwise, rotate_clockwise_all};
pub use steps::window::{sliding_window, sliding_window_all, Crop, Positions, WindowSpec};
