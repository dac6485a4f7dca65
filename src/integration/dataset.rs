//! Image-directory datasets with plain-text ground truth.
//!
//! Layout under the data root:
//!
//! ```text
//! <root>/<dataset>/<video>/images/00001.jpg
//! <root>/<dataset>/<video>/groundtruth.txt
//! ```
//!
//! Line `n` of `groundtruth.txt` lists the regions of frame `n` as integers in
//! groups of four, `x1 y1 x2 y2`. An empty line is a frame without objects.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::error::{Result, TrackError};
use crate::integration::FrameSource;
use crate::integration::output::frame_file_name;
use crate::tracker::Region;

pub const GROUND_TRUTH_FILE: &str = "groundtruth.txt";

/// A named dataset of videos below a data root.
#[derive(Debug, Clone)]
pub struct ImageDirDataset {
    dir: PathBuf,
}

impl ImageDirDataset {
    pub fn new(data_root: impl AsRef<Path>, dataset: &str) -> Self {
        Self {
            dir: data_root.as_ref().join(dataset),
        }
    }

    /// Sorted names of the video directories in the dataset.
    pub fn videos(&self) -> Result<Vec<String>> {
        let mut videos = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                videos.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        videos.sort();
        Ok(videos)
    }

    /// Load a video's ground truth and prepare frame access.
    pub fn open(&self, video: &str) -> Result<ImageDirVideo> {
        let dir = self.dir.join(video);
        let gt_path = dir.join(GROUND_TRUTH_FILE);
        let text = fs::read_to_string(&gt_path)?;
        let annotations = parse_ground_truth(&gt_path, &text)?;
        log::info!("loaded {} annotated frames from {}", annotations.len(), gt_path.display());

        Ok(ImageDirVideo {
            images: dir.join("images"),
            annotations,
        })
    }
}

/// Frames and annotations of one video on disk.
#[derive(Debug, Clone)]
pub struct ImageDirVideo {
    images: PathBuf,
    annotations: Vec<Vec<Region>>,
}

impl ImageDirVideo {
    pub fn frame_path(&self, number: u32) -> PathBuf {
        self.images.join(frame_file_name(number, "jpg"))
    }
}

impl FrameSource for ImageDirVideo {
    type Error = TrackError;

    fn frame_count(&self) -> u32 {
        self.annotations.len() as u32
    }

    fn frame(&mut self, number: u32) -> Result<RgbImage> {
        Ok(image::open(self.frame_path(number))?.to_rgb8())
    }

    fn ground_truth(&mut self, number: u32) -> Result<Vec<Region>> {
        let index = (number as usize).checked_sub(1);
        index
            .and_then(|i| self.annotations.get(i))
            .cloned()
            .ok_or_else(|| TrackError::Annotation {
                path: self.images.with_file_name(GROUND_TRUTH_FILE),
                line: number as usize,
                reason: "no such frame".to_string(),
            })
    }
}

/// Parse a ground-truth file, one line of regions per frame.
pub fn parse_ground_truth(path: &Path, text: &str) -> Result<Vec<Vec<Region>>> {
    text.lines()
        .enumerate()
        .map(|(i, line)| parse_line(line).map_err(|reason| TrackError::Annotation {
            path: path.to_path_buf(),
            line: i + 1,
            reason,
        }))
        .collect()
}

fn parse_line(line: &str) -> std::result::Result<Vec<Region>, String> {
    let values = line
        .split_whitespace()
        .map(|v| v.parse::<i64>().map_err(|e| format!("{v:?}: {e}")))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    if values.len() % 4 != 0 {
        return Err(format!("{} values is not a multiple of 4", values.len()));
    }
    Ok(values
        .chunks_exact(4)
        .map(|c| Region::from_tlbr(c[0] as f32, c[1] as f32, c[2] as f32, c[3] as f32))
        .collect())
}
