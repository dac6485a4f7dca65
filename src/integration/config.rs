//! Run configuration and command line surface.

use std::path::PathBuf;

use clap::Parser;

use crate::error::{Result, TrackError};
use crate::tracker::{OverlapPolicy, TrackerConfig};

/// Which outputs a run produces.
///
/// Rendering and interactive debugging cannot be combined, and benchmarking
/// measures raw throughput with every other output switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Time the run and append a summary row to the benchmark log.
    Benchmark,
    /// Pause after every frame and log continuity details.
    Debug { save_bbox: bool },
    Standard { render: bool, save_bbox: bool },
}

impl Default for RunMode {
    fn default() -> Self {
        Self::Standard {
            render: false,
            save_bbox: false,
        }
    }
}

impl RunMode {
    /// Build a mode from independent command line switches.
    pub fn from_flags(benchmark: bool, render: bool, save_bbox: bool, debug: bool) -> Result<Self> {
        if render && debug {
            return Err(TrackError::IncompatibleModes);
        }
        if benchmark {
            if render || save_bbox || debug {
                log::warn!("benchmark mode: rendering, saving and debugging are disabled");
            }
            return Ok(Self::Benchmark);
        }
        if debug {
            return Ok(Self::Debug { save_bbox });
        }
        Ok(Self::Standard { render, save_bbox })
    }

    pub fn is_benchmark(&self) -> bool {
        matches!(self, Self::Benchmark)
    }

    pub fn is_debug(&self) -> bool {
        matches!(self, Self::Debug { .. })
    }

    pub fn renders(&self) -> bool {
        matches!(self, Self::Standard { render: true, .. })
    }

    pub fn saves_bbox(&self) -> bool {
        matches!(
            self,
            Self::Debug { save_bbox: true } | Self::Standard { save_bbox: true, .. }
        )
    }

    /// Whether annotated frames have to be drawn at all.
    pub fn draws(&self) -> bool {
        self.renders() || self.is_debug()
    }
}

/// Everything needed to track one dataset.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory holding the datasets and receiving the outputs.
    pub data_root: PathBuf,
    pub dataset: String,
    /// Track only this video instead of every video in the dataset.
    pub video: Option<String>,
    pub mode: RunMode,
    pub tracker: TrackerConfig,
}

impl RunConfig {
    pub fn new(data_root: impl Into<PathBuf>, dataset: impl Into<String>) -> Self {
        Self {
            data_root: data_root.into(),
            dataset: dataset.into(),
            video: None,
            mode: RunMode::default(),
            tracker: TrackerConfig::default(),
        }
    }

    pub fn with_video(mut self, video: impl Into<String>) -> Self {
        self.video = Some(video.into());
        self
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_tracker(mut self, tracker: TrackerConfig) -> Self {
        self.tracker = tracker;
        self
    }
}

/// Simple optical-flow based object tracker.
#[derive(Parser, Debug, Clone)]
#[command(name = "sofot", about = "Simple optical-flow based object tracker")]
pub struct CliArgs {
    /// Folder name under the data root to be used
    #[arg(long)]
    pub dataset: String,
    /// Run only on this video
    #[arg(long)]
    pub video: Option<String>,
    /// Benchmark mode: rendering, saving and debugging are disabled
    #[arg(long)]
    pub benchmark: bool,
    /// Render frames with bounding boxes
    #[arg(long)]
    pub render: bool,
    /// Save bounding boxes per frame as "x1 y1 x2 y2" lines
    #[arg(long)]
    pub save_bbox: bool,
    /// Stop after each frame and print debugging information
    #[arg(long)]
    pub debug: bool,
    #[arg(long, default_value = "data")]
    pub data_root: PathBuf,
    /// Overlap phase policy: shared, exclusive or optimal
    #[arg(long, default_value = "shared")]
    pub policy: OverlapPolicy,
    /// Seed for identity colours
    #[arg(long)]
    pub seed: Option<u64>,
}

impl CliArgs {
    /// Validate the switches into a run configuration.
    pub fn run_config(&self) -> Result<RunConfig> {
        let mode = RunMode::from_flags(self.benchmark, self.render, self.save_bbox, self.debug)?;
        Ok(RunConfig {
            data_root: self.data_root.clone(),
            dataset: self.dataset.clone(),
            video: self.video.clone(),
            mode,
            tracker: TrackerConfig {
                overlap_policy: self.policy,
                color_seed: self.seed,
            },
        })
    }
}
