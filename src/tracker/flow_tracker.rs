//! Per-frame association and error accounting driven by sparse point flow.

use image::GrayImage;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::{Result, TrackError};
use crate::integration::{FeatureDetector, PointTracker};
use crate::tracker::error_account::ErrorAccumulator;
use crate::tracker::identity::{IdentityColor, IdentityLedger};
use crate::tracker::matching::{self, Association, OverlapPolicy};
use crate::tracker::point_set::PointSet;
use crate::tracker::region::Region;
use crate::tracker::track_state::TrackerPhase;

/// Configuration for the FlowTracker.
#[derive(Debug, Clone, Default)]
pub struct TrackerConfig {
    /// Candidate sharing rule for the overlap phase of both associations.
    pub overlap_policy: OverlapPolicy,
    /// Seed for identity colours; random when unset.
    pub color_seed: Option<u64>,
}

/// What a single step observed.
#[derive(Debug, Clone)]
pub struct StepReport {
    /// 1-based index of the frame just processed.
    pub frame: u32,
    /// Previous regions (truth) against this frame's regions.
    pub continuity: Association,
    /// This frame's regions (truth) against ground truth.
    pub ground_truth: Association,
    /// Regions left without a ground-truth partner.
    pub deficit: usize,
    /// Whether the identity ledger had to be rebuilt.
    pub ledger_changed: bool,
}

/// Tracks every ground-truth object of the first frame through a video.
///
/// Objects are addressed by their position in the current region sequence;
/// identity is re-derived each frame by associating the previous regions with
/// the new ones.
pub struct FlowTracker {
    phase: TrackerPhase,
    frame_id: u32,
    total_frames: u32,
    prev_gray: GrayImage,
    point_sets: Vec<PointSet>,
    regions: Vec<Region>,
    ledger: IdentityLedger,
    errors: ErrorAccumulator,
    config: TrackerConfig,
}

impl FlowTracker {
    /// Seed point sets from the ground truth of frame 1.
    pub fn new<D: FeatureDetector>(
        config: TrackerConfig,
        first_frame: GrayImage,
        ground_truth: &[Region],
        total_frames: u32,
        detector: &mut D,
    ) -> Result<Self> {
        let (width, height) = first_frame.dimensions();
        let mut point_sets = Vec::with_capacity(ground_truth.len());
        for region in ground_truth {
            let mask = region.mask(width, height);
            let points = detector
                .detect(&first_frame, &mask)
                .map_err(TrackError::detector)?;
            log::trace!("seeded {} points in {:?}", points.len(), region);
            point_sets.push(PointSet::new(points));
        }

        let mut rng = match config.color_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let ledger = IdentityLedger::<IdentityColor>::random(ground_truth.len(), &mut rng);

        Ok(Self {
            phase: if total_frames <= 1 {
                TrackerPhase::Done
            } else {
                TrackerPhase::Init
            },
            frame_id: 1,
            total_frames,
            prev_gray: first_frame,
            point_sets,
            regions: ground_truth.to_vec(),
            ledger,
            errors: ErrorAccumulator::new(),
            config,
        })
    }

    /// Process the next frame.
    pub fn step<T: PointTracker>(
        &mut self,
        frame: GrayImage,
        ground_truth: &[Region],
        tracker: &mut T,
    ) -> Result<StepReport> {
        if self.phase == TrackerPhase::Done {
            return Err(TrackError::Finished(self.frame_id));
        }
        let frame_id = self.frame_id + 1;

        // Step 1: Follow every object's points into the new frame
        let mut point_sets = Vec::with_capacity(self.point_sets.len());
        let mut regions = Vec::with_capacity(self.point_sets.len());
        for (index, points) in self.point_sets.iter().enumerate() {
            if points.is_empty() {
                continue;
            }
            let tracked = tracker
                .track(&self.prev_gray, &frame, points.points())
                .map_err(TrackError::point_tracker)?;

            // Step 2: Surviving points define the object's region
            let survivors = PointSet::from_tracked(tracked);
            match survivors.region() {
                Some(region) => {
                    regions.push(region);
                    point_sets.push(survivors);
                }
                None => log::debug!("frame {frame_id}: object {index} lost all points"),
            }
        }

        // Step 3: Continuity with the previous frame
        let policy = self.config.overlap_policy;
        let continuity = matching::associate(&self.regions, &regions, policy);
        let ledger_changed = self.ledger.reconcile(&continuity, self.regions.len());

        // Step 4: Score against ground truth
        let ground_truth = matching::associate(&regions, ground_truth, policy);
        let deficit = regions.len().saturating_sub(ground_truth.len());
        self.errors.record(frame_id, deficit);

        log::debug!(
            "frame {frame_id}: {} regions, continuity {:?}, deficit {deficit}",
            regions.len(),
            continuity.pairs
        );

        // Step 5: Update state
        self.prev_gray = frame;
        self.point_sets = point_sets;
        self.regions = regions;
        self.frame_id = frame_id;
        self.phase = if frame_id >= self.total_frames {
            TrackerPhase::Done
        } else {
            TrackerPhase::Stepping
        };

        Ok(StepReport {
            frame: frame_id,
            continuity,
            ground_truth,
            deficit,
            ledger_changed,
        })
    }

    pub fn phase(&self) -> TrackerPhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == TrackerPhase::Done
    }

    /// Index of the last processed frame.
    pub fn frame_id(&self) -> u32 {
        self.frame_id
    }

    /// Index of the frame the next [`step`](Self::step) expects.
    pub fn next_frame(&self) -> u32 {
        self.frame_id + 1
    }

    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn point_sets(&self) -> &[PointSet] {
        &self.point_sets
    }

    pub fn ledger(&self) -> &IdentityLedger {
        &self.ledger
    }

    pub fn errors(&self) -> &ErrorAccumulator {
        &self.errors
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}
