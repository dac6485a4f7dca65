//! TrackerPipeline for driving the tracker over whole videos.

use std::path::PathBuf;
use std::time::Instant;

use crate::error::{Result, TrackError};
use crate::integration::config::{RunConfig, RunMode};
use crate::integration::dataset::ImageDirDataset;
use crate::integration::output::{
    self, BenchmarkLog, FrameDisplay, OutputLayout, RenderBuffer, RunSummary, StdinPause,
};
use crate::integration::{FeatureDetector, FrameSource, PointTracker};
use crate::tracker::{FlowTracker, TrackerConfig};

/// Bundles the feature backends with run-mode dependent outputs.
///
/// Videos are tracked one after the other; each run owns its own
/// [`FlowTracker`].
pub struct TrackerPipeline<D: FeatureDetector, T: PointTracker> {
    detector: D,
    point_tracker: T,
    config: TrackerConfig,
    mode: RunMode,
    layout: OutputLayout,
    display: Box<dyn FrameDisplay>,
}

impl<D: FeatureDetector, T: PointTracker> TrackerPipeline<D, T> {
    /// Create a new pipeline with the given backends and run configuration.
    pub fn new(detector: D, point_tracker: T, run: &RunConfig) -> Self {
        Self {
            detector,
            point_tracker,
            config: run.tracker.clone(),
            mode: run.mode,
            layout: OutputLayout::new(&run.data_root, &run.dataset),
            display: Box::new(StdinPause),
        }
    }

    /// Replace the debug display.
    pub fn with_display(mut self, display: impl FrameDisplay + 'static) -> Self {
        self.display = Box::new(display);
        self
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Track one video from its first to its last frame.
    ///
    /// Any failure of the frame source or the backends aborts the run.
    pub fn track_video<S: FrameSource>(&mut self, video: &str, source: &mut S) -> Result<RunSummary> {
        let total_frames = source.frame_count();
        if total_frames == 0 {
            return Err(TrackError::EmptyVideo(video.to_string()));
        }
        log::info!("tracking {video}: {total_frames} frames, mode {:?}", self.mode);
        self.layout.prepare(video)?;

        let start = Instant::now();
        let first = source.frame(1).map_err(TrackError::frame_source)?;
        let ground_truth = source.ground_truth(1).map_err(TrackError::frame_source)?;
        let mut tracker = FlowTracker::new(
            self.config.clone(),
            image::imageops::grayscale(&first),
            &ground_truth,
            total_frames,
            &mut self.detector,
        )?;

        let mut render = RenderBuffer::new();
        let detections_dir = self.layout.detections_dir(video);

        while !tracker.is_done() {
            let number = tracker.next_frame();
            let mut frame = source.frame(number).map_err(TrackError::frame_source)?;
            let ground_truth = source.ground_truth(number).map_err(TrackError::frame_source)?;
            let report = tracker.step(
                image::imageops::grayscale(&frame),
                &ground_truth,
                &mut self.point_tracker,
            )?;

            if self.mode.is_benchmark() {
                continue;
            }

            if self.mode.draws() {
                let points = self.mode.is_debug().then(|| tracker.point_sets());
                output::annotate(&mut frame, tracker.regions(), tracker.ledger(), points);
            }
            if self.mode.is_debug() {
                log::debug!("frame {}: ledger {:?}", report.frame, tracker.ledger().tokens());
                log::debug!("frame {}: pairs {:?}", report.frame, report.continuity.pairs);
                self.display.show(&frame, true)?;
            }
            if self.mode.saves_bbox() {
                let path = detections_dir.join(output::frame_file_name(report.frame, "txt"));
                output::write_bboxes(&path, tracker.regions())?;
            }
            if self.mode.renders() {
                render.push(frame);
            }
        }

        let summary = RunSummary {
            video: video.to_string(),
            frames: total_frames,
            elapsed: start.elapsed(),
            total_error: tracker.errors().total(),
            first_error_frame: tracker.errors().first_error_frame(),
        };

        if self.mode.renders() {
            render.flush(&self.layout.render_dir(video))?;
        }
        if self.mode.is_benchmark() {
            BenchmarkLog::new(self.layout.benchmark_file()).append(&summary)?;
        }

        log::info!(
            "{video}: {:.2}s, {:.1} fps, error {}, first error frame {:?}",
            summary.elapsed.as_secs_f64(),
            summary.fps(),
            summary.total_error,
            summary.first_error_frame
        );
        Ok(summary)
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a reference to the underlying point tracker.
    pub fn point_tracker(&self) -> &T {
        &self.point_tracker
    }
}

/// Runs a [`TrackerPipeline`] over the videos of an on-disk dataset.
pub struct DatasetRunner<D: FeatureDetector, T: PointTracker> {
    dataset: ImageDirDataset,
    video: Option<String>,
    pipeline: TrackerPipeline<D, T>,
}

impl<D: FeatureDetector, T: PointTracker> DatasetRunner<D, T> {
    pub fn new(detector: D, point_tracker: T, run: &RunConfig) -> Self {
        Self {
            dataset: ImageDirDataset::new(&run.data_root, &run.dataset),
            video: run.video.clone(),
            pipeline: TrackerPipeline::new(detector, point_tracker, run),
        }
    }

    pub fn pipeline_mut(&mut self) -> &mut TrackerPipeline<D, T> {
        &mut self.pipeline
    }

    /// Videos that will be tracked, in order.
    pub fn videos(&self) -> Result<Vec<String>> {
        match &self.video {
            Some(video) => Ok(vec![video.clone()]),
            None => self.dataset.videos(),
        }
    }

    /// Track every selected video sequentially.
    pub fn run(&mut self) -> Result<Vec<RunSummary>> {
        let mut summaries = Vec::new();
        for video in self.videos()? {
            let mut source = self.dataset.open(&video)?;
            summaries.push(self.pipeline.track_video(&video, &mut source)?);
        }
        Ok(summaries)
    }

    pub fn benchmark_file(&self) -> PathBuf {
        self.pipeline.layout().benchmark_file()
    }
}
