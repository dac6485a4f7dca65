//! Traits for the external feature, flow and frame backends.

use image::{GrayImage, RgbImage};
use nalgebra::Point2;

use crate::error::BoxError;
use crate::tracker::{Region, TrackedPoint};

/// Salient point detector used to seed each object's point set.
///
/// Implement this trait to connect any corner detector to the tracker.
///
/// # Example
///
/// ```ignore
/// use sofot_rs::FeatureDetector;
///
/// struct ShiTomasi { max_corners: usize }
///
/// impl FeatureDetector for ShiTomasi {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, frame: &GrayImage, mask: &GrayImage) -> Result<Vec<Point2<f32>>, Self::Error> {
///         // Rank corners inside the mask and keep the best `max_corners`
///         Ok(vec![])
///     }
/// }
/// ```
pub trait FeatureDetector {
    /// Error type for detection failures.
    type Error: Into<BoxError>;

    /// Return up to a fixed number of salient points of `frame` lying where
    /// `mask` is non-zero.
    fn detect(&mut self, frame: &GrayImage, mask: &GrayImage) -> Result<Vec<Point2<f32>>, Self::Error>;
}

/// Sparse point tracker between two consecutive grayscale frames.
pub trait PointTracker {
    /// Error type for tracking failures.
    type Error: Into<BoxError>;

    /// Follow `points` from `prev` into `next`.
    ///
    /// # Returns
    /// One entry per input point, with its new position and whether the
    /// tracker could follow it.
    fn track(
        &mut self,
        prev: &GrayImage,
        next: &GrayImage,
        points: &[Point2<f32>],
    ) -> Result<Vec<TrackedPoint>, Self::Error>;
}

/// Decoded frames and ground-truth regions of a single video.
///
/// Frame numbers are 1-based.
pub trait FrameSource {
    type Error: Into<BoxError>;

    /// Total number of frames, equal to the number of annotated frames.
    fn frame_count(&self) -> u32;

    fn frame(&mut self, number: u32) -> Result<RgbImage, Self::Error>;

    fn ground_truth(&mut self, number: u32) -> Result<Vec<Region>, Self::Error>;
}
