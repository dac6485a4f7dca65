//! Integration module connecting the tracker with its external collaborators.
//!
//! This module provides the traits for feature detection, point tracking and
//! frame sources, an on-disk dataset reader, the output sinks and the
//! pipeline that drives whole videos.

mod config;
mod dataset;
mod detector;
mod output;
mod pipeline;

pub use config::{CliArgs, RunConfig, RunMode};
pub use dataset::{GROUND_TRUTH_FILE, ImageDirDataset, ImageDirVideo, parse_ground_truth};
pub use detector::{FeatureDetector, FrameSource, PointTracker};
pub use output::{
    BenchmarkLog, FrameDisplay, OutputLayout, RENDER_FPS, RenderBuffer, RunSummary, StdinPause,
    annotate, frame_file_name, write_bboxes,
};
pub use pipeline::{DatasetRunner, TrackerPipeline};
