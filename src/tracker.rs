mod error_account;
mod flow_tracker;
mod identity;
mod matching;
mod point_set;
mod region;
mod track_state;

pub use error_account::ErrorAccumulator;
pub use flow_tracker::{FlowTracker, StepReport, TrackerConfig};
pub use identity::{IdentityColor, IdentityLedger};
pub use matching::{Association, OverlapPolicy, associate};
pub use point_set::{PointSet, TrackedPoint};
pub use region::{Region, overlap_matrix};
pub use track_state::TrackerPhase;
