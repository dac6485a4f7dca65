//! Error types for the tracker and its collaborators.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TrackError>;

/// Boxed error returned by an external collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("render and debug modes are mutually exclusive")]
    IncompatibleModes,

    #[error("feature detector failed: {0}")]
    Detector(#[source] BoxError),

    #[error("point tracker failed: {0}")]
    PointTracker(#[source] BoxError),

    #[error("frame source failed: {0}")]
    FrameSource(#[source] BoxError),

    #[error("malformed annotation {path}:{line}: {reason}")]
    Annotation {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("video {0} has no frames")]
    EmptyVideo(String),

    #[error("tracking already finished at frame {0}")]
    Finished(u32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl TrackError {
    pub fn detector<E: Into<BoxError>>(err: E) -> Self {
        Self::Detector(err.into())
    }

    pub fn point_tracker<E: Into<BoxError>>(err: E) -> Self {
        Self::PointTracker(err.into())
    }

    pub fn frame_source<E: Into<BoxError>>(err: E) -> Self {
        Self::FrameSource(err.into())
    }
}
