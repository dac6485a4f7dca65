/// Lifecycle of a single video run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerPhase {
    /// Point sets seeded from the first frame, no step taken yet
    #[default]
    Init,
    /// Stepping through frames 2..N
    Stepping,
    /// Last frame processed
    Done,
}
