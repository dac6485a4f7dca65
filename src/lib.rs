//! Simple optical-flow based multi-object tracker.
//!
//! Objects annotated in the first frame of a video are followed through
//! sparse feature points. Every frame the new regions are re-associated with
//! the previous ones for identity continuity and with the ground truth to
//! accumulate a tracking error.

pub mod error;
pub mod integration;
pub mod tracker;

pub use error::{Result, TrackError};
pub use integration::{
    CliArgs, DatasetRunner, FeatureDetector, FrameSource, PointTracker, RunConfig, RunMode,
    RunSummary, TrackerPipeline,
};
pub use tracker::{
    Association, ErrorAccumulator, FlowTracker, IdentityLedger, OverlapPolicy, PointSet, Region,
    StepReport, TrackedPoint, TrackerConfig, TrackerPhase, associate,
};
