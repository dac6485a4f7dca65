#![allow(dead_code)]

use std::convert::Infallible;
use std::io;
use std::sync::{Arc, Mutex};

use image::{GrayImage, Rgb, RgbImage};
use nalgebra::Point2;
use sofot_rs::integration::FrameDisplay;
use sofot_rs::{FeatureDetector, FrameSource, PointTracker, Region, TrackedPoint};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn region(x1: f32, y1: f32, x2: f32, y2: f32) -> Region {
    Region::from_tlbr(x1, y1, x2, y2)
}

/// Returns the four corner pixels of the masked area.
pub struct CornerDetector;

impl FeatureDetector for CornerDetector {
    type Error = Infallible;

    fn detect(&mut self, _frame: &GrayImage, mask: &GrayImage) -> Result<Vec<Point2<f32>>, Self::Error> {
        let inside: Vec<(u32, u32)> = mask
            .enumerate_pixels()
            .filter(|(_, _, p)| p[0] > 0)
            .map(|(x, y, _)| (x, y))
            .collect();
        let (Some(&(x0, y0)), Some(&(x1, y1))) = (inside.first(), inside.last()) else {
            return Ok(vec![]);
        };
        Ok(vec![
            Point2::new(x0 as f32, y0 as f32),
            Point2::new(x1 as f32, y0 as f32),
            Point2::new(x0 as f32, y1 as f32),
            Point2::new(x1 as f32, y1 as f32),
        ])
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Action {
    /// Every point of the object becomes invalid
    Drop,
    /// Every point moves by the offset
    Shift(f32, f32),
}

/// Applies `action` at `frame` to the object whose first point has an x
/// coordinate inside `[x_from, x_to)`.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub frame: u8,
    pub x_from: f32,
    pub x_to: f32,
    pub action: Action,
}

/// Point tracker that keeps points still unless a rule says otherwise.
///
/// The frame number is read from the first pixel of the next frame, which
/// [`MemorySource`] fills with it.
#[derive(Debug, Default)]
pub struct ScriptedTracker {
    pub rules: Vec<Rule>,
    pub calls: usize,
}

impl ScriptedTracker {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules, calls: 0 }
    }
}

impl PointTracker for ScriptedTracker {
    type Error = Infallible;

    fn track(
        &mut self,
        _prev: &GrayImage,
        next: &GrayImage,
        points: &[Point2<f32>],
    ) -> Result<Vec<TrackedPoint>, Self::Error> {
        self.calls += 1;
        let frame = next.get_pixel(0, 0)[0];
        let x = points.first().map(|p| p.x).unwrap_or_default();
        let action = self
            .rules
            .iter()
            .find(|r| r.frame == frame && r.x_from <= x && x < r.x_to)
            .map(|r| r.action);

        Ok(points
            .iter()
            .map(|p| match action {
                Some(Action::Drop) => TrackedPoint::invalid(p.x, p.y),
                Some(Action::Shift(dx, dy)) => TrackedPoint::valid(p.x + dx, p.y + dy),
                None => TrackedPoint::valid(p.x, p.y),
            })
            .collect())
    }
}

/// In-memory video whose frames are uniform images valued by frame number.
pub struct MemorySource {
    pub ground_truth: Vec<Vec<Region>>,
}

impl MemorySource {
    /// `frames` frames that all share the same ground truth.
    pub fn constant(frames: usize, regions: &[Region]) -> Self {
        Self {
            ground_truth: vec![regions.to_vec(); frames],
        }
    }
}

impl FrameSource for MemorySource {
    type Error = io::Error;

    fn frame_count(&self) -> u32 {
        self.ground_truth.len() as u32
    }

    fn frame(&mut self, number: u32) -> Result<RgbImage, Self::Error> {
        if number == 0 || number as usize > self.ground_truth.len() {
            return Err(io::Error::new(io::ErrorKind::NotFound, format!("frame {number}")));
        }
        let v = number as u8;
        Ok(RgbImage::from_pixel(100, 100, Rgb([v, v, v])))
    }

    fn ground_truth(&mut self, number: u32) -> Result<Vec<Region>, Self::Error> {
        self.ground_truth
            .get((number as usize).wrapping_sub(1))
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("annotation {number}")))
    }
}

/// Display that records how often it was asked to wait.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    pub waits: Arc<Mutex<usize>>,
}

impl FrameDisplay for RecordingDisplay {
    fn show(&mut self, _frame: &RgbImage, wait: bool) -> io::Result<()> {
        if wait {
            *self.waits.lock().unwrap() += 1;
        }
        Ok(())
    }
}
