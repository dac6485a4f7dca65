//! Output sinks: per-frame bbox files, benchmark log, rendered frames and
//! the interactive debug display.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::error::Result;
use crate::tracker::{IdentityLedger, PointSet, Region};

/// Frame rate tag of rendered output.
pub const RENDER_FPS: u32 = 30;

const UNTRACKED_COLOR: Rgb<u8> = Rgb([128, 128, 128]);

/// `00042.ext` style name for a 1-based frame number.
pub fn frame_file_name(frame: u32, ext: &str) -> String {
    format!("{frame:05}.{ext}")
}

/// Where a dataset's outputs go: `<root>/sofot_<dataset>/...`.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    dir: PathBuf,
}

impl OutputLayout {
    pub fn new(data_root: impl AsRef<Path>, dataset: &str) -> Self {
        Self {
            dir: data_root.as_ref().join(format!("sofot_{dataset}")),
        }
    }

    pub fn dataset_dir(&self) -> &Path {
        &self.dir
    }

    pub fn video_dir(&self, video: &str) -> PathBuf {
        self.dir.join(video)
    }

    pub fn detections_dir(&self, video: &str) -> PathBuf {
        self.video_dir(video).join("detections")
    }

    pub fn render_dir(&self, video: &str) -> PathBuf {
        self.video_dir(video).join("render")
    }

    pub fn benchmark_file(&self) -> PathBuf {
        self.dir.join("benchmark.csv")
    }

    /// Create the output directories of a video.
    pub fn prepare(&self, video: &str) -> io::Result<()> {
        fs::create_dir_all(self.detections_dir(video))
    }
}

/// Write one `x1 y1 x2 y2` line per region.
pub fn write_bboxes(path: &Path, regions: &[Region]) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for region in regions {
        let [x1, y1, x2, y2] = region.to_pixels();
        writeln!(out, "{x1} {y1} {x2} {y2}")?;
    }
    out.flush()
}

/// Outcome of tracking one video.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub video: String,
    pub frames: u32,
    pub elapsed: Duration,
    pub total_error: u64,
    pub first_error_frame: Option<u32>,
}

impl RunSummary {
    /// Frames per second over the whole run.
    pub fn fps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.frames as f64 / secs
        } else {
            0.0
        }
    }

    /// `video,elapsedSeconds,framesPerSecond,totalError,firstErrorFrame`
    pub fn record(&self) -> [String; 5] {
        [
            self.video.clone(),
            self.elapsed.as_secs_f64().to_string(),
            self.fps().to_string(),
            self.total_error.to_string(),
            self.first_error_frame.map(|f| f.to_string()).unwrap_or_default(),
        ]
    }
}

/// Benchmark rows appended to a CSV file, one per video run.
#[derive(Debug, Clone)]
pub struct BenchmarkLog {
    path: PathBuf,
}

impl BenchmarkLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, summary: &RunSummary) -> Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(summary.record())?;
        writer.flush()?;
        Ok(())
    }
}

/// Annotated frames collected during a run and written out at the end.
#[derive(Debug, Default)]
pub struct RenderBuffer {
    frames: Vec<RgbImage>,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: RgbImage) {
        self.frames.push(frame);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Write the buffered frames as a numbered PNG sequence into `dir`.
    pub fn flush(&mut self, dir: &Path) -> Result<usize> {
        fs::create_dir_all(dir)?;
        let count = self.frames.len();
        for (i, frame) in self.frames.drain(..).enumerate() {
            frame.save(dir.join(frame_file_name(i as u32 + 1, "png")))?;
        }
        log::info!("rendered {count} frames at {RENDER_FPS} fps to {}", dir.display());
        Ok(count)
    }
}

/// Draw every region in its identity colour; optionally mark the points.
pub fn annotate(
    frame: &mut RgbImage,
    regions: &[Region],
    ledger: &IdentityLedger,
    points: Option<&[PointSet]>,
) {
    for (i, region) in regions.iter().enumerate() {
        let color = ledger.get(i).copied().unwrap_or(UNTRACKED_COLOR);
        let [x1, y1, x2, y2] = region.to_pixels();
        let width = (x2 - x1).max(1) as u32;
        let height = (y2 - y1).max(1) as u32;

        // 2 px border
        for offset in 0..2 {
            let rect = Rect::at(x1 as i32 - offset, y1 as i32 - offset)
                .of_size(width + 2 * offset as u32, height + 2 * offset as u32);
            draw_hollow_rect_mut(frame, rect, color);
        }

        if let Some(set) = points.and_then(|sets| sets.get(i)) {
            for p in set.points() {
                draw_filled_circle_mut(frame, (p.x as i32, p.y as i32), 5, color);
            }
        }
    }
}

/// Shows annotated frames while debugging.
pub trait FrameDisplay {
    /// Present `frame`; when `wait` is set, block until the user continues.
    fn show(&mut self, frame: &RgbImage, wait: bool) -> io::Result<()>;
}

/// Headless display that pauses on stdin.
#[derive(Debug, Default)]
pub struct StdinPause;

impl FrameDisplay for StdinPause {
    fn show(&mut self, frame: &RgbImage, wait: bool) -> io::Result<()> {
        if wait {
            let (w, h) = frame.dimensions();
            eprint!("[{w}x{h}] press Enter for the next frame");
            io::stderr().flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
        }
        Ok(())
    }
}
