//! Two-phase region association: best overlap first, nearest border second.

use ndarray::Array2;

use crate::tracker::region::{Region, overlap_matrix};

/// How the overlap phase treats candidates already claimed by an earlier
/// truth region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Every truth region picks its best candidate among all candidates, so a
    /// candidate may be paired with several truth regions.
    #[default]
    Shared,
    /// Greedy in truth order, each candidate is taken at most once.
    Exclusive,
    /// Exclusive assignment maximising the summed overlap ratio.
    Optimal,
}

impl std::str::FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "shared" => Ok(Self::Shared),
            "exclusive" => Ok(Self::Exclusive),
            "optimal" => Ok(Self::Optimal),
            other => Err(format!("unknown overlap policy: {other}")),
        }
    }
}

/// Pairs produced by [`associate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Association {
    /// `(truth_index, candidate_index)` pairs, overlap phase first, each
    /// phase in truth order.
    pub pairs: Vec<(usize, usize)>,
    /// Number of leading pairs produced by the overlap phase.
    pub overlap_matches: usize,
    pub unmatched_truth: Vec<usize>,
    pub unmatched_candidates: Vec<usize>,
}

impl Association {
    /// Number of truth regions covered by a pair.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs from the distance phase.
    pub fn distance_pairs(&self) -> &[(usize, usize)] {
        &self.pairs[self.overlap_matches..]
    }
}

/// Pair `truth` regions with `candidates`.
///
/// Each truth region is first paired with its highest-overlap candidate
/// (ties keep the lowest candidate index, zero overlap never matches). Truth
/// regions still unpaired then take the nearest remaining candidate by border
/// distance, without any distance threshold, until candidates run out.
pub fn associate(truth: &[Region], candidates: &[Region], policy: OverlapPolicy) -> Association {
    let ratios = overlap_matrix(truth, candidates);
    let mut pairs = match policy {
        OverlapPolicy::Shared => greedy_overlap(&ratios, false),
        OverlapPolicy::Exclusive => greedy_overlap(&ratios, true),
        OverlapPolicy::Optimal => optimal_overlap(&ratios),
    };
    let overlap_matches = pairs.len();

    let mut truth_used = vec![false; truth.len()];
    let mut cand_used = vec![false; candidates.len()];
    for &(t, c) in &pairs {
        truth_used[t] = true;
        cand_used[c] = true;
    }

    if overlap_matches < truth.len() {
        for (t, region) in truth.iter().enumerate() {
            if truth_used[t] {
                continue;
            }
            let nearest = candidates
                .iter()
                .enumerate()
                .filter(|(c, _)| !cand_used[*c])
                .map(|(c, cand)| (c, region.border_distance(cand)))
                .fold(None, |best: Option<(usize, f32)>, (c, d)| match best {
                    Some((_, best_d)) if best_d <= d => best,
                    _ => Some((c, d)),
                });

            if let Some((c, _)) = nearest {
                pairs.push((t, c));
                truth_used[t] = true;
                cand_used[c] = true;
            }
        }
    }

    Association {
        pairs,
        overlap_matches,
        unmatched_truth: unused(&truth_used),
        unmatched_candidates: unused(&cand_used),
    }
}

fn unused(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter_map(|(i, &used)| if used { None } else { Some(i) })
        .collect()
}

fn greedy_overlap(ratios: &Array2<f32>, exclusive: bool) -> Vec<(usize, usize)> {
    let (rows, cols) = ratios.dim();
    let mut taken = vec![false; cols];
    let mut pairs = Vec::new();

    for t in 0..rows {
        let mut best = 0.0;
        let mut matched = None;
        for c in 0..cols {
            if exclusive && taken[c] {
                continue;
            }
            if ratios[[t, c]] > best {
                best = ratios[[t, c]];
                matched = Some(c);
            }
        }
        if let Some(c) = matched {
            taken[c] = true;
            pairs.push((t, c));
        }
    }
    pairs
}

fn optimal_overlap(ratios: &Array2<f32>) -> Vec<(usize, usize)> {
    let (num_rows, num_cols) = ratios.dim();
    if num_rows == 0 || num_cols == 0 {
        return vec![];
    }

    let size = num_rows.max(num_cols);
    let mut padded = Array2::<f64>::from_elem((size, size), 1e6);
    for i in 0..num_rows {
        for j in 0..num_cols {
            padded[[i, j]] = 1.0 - ratios[[i, j]] as f64;
        }
    }

    match lapjv::lapjv(&padded) {
        Ok((row_to_col, _)) => row_to_col
            .iter()
            .enumerate()
            .filter(|&(row, &col)| row < num_rows && col < num_cols && ratios[[row, col]] > 0.0)
            .map(|(row, &col)| (row, col))
            .collect(),
        Err(_) => {
            log::warn!("optimal assignment failed, falling back to exclusive greedy");
            greedy_overlap(ratios, true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(x1: f32, y1: f32, x2: f32, y2: f32) -> Region {
        Region::from_tlbr(x1, y1, x2, y2)
    }

    fn has_unique_indices(pairs: &[(usize, usize)]) -> (bool, bool) {
        let mut truth: Vec<_> = pairs.iter().map(|p| p.0).collect();
        let mut cands: Vec<_> = pairs.iter().map(|p| p.1).collect();
        truth.sort_unstable();
        truth.dedup();
        cands.sort_unstable();
        cands.dedup();
        (truth.len() == pairs.len(), cands.len() == pairs.len())
    }

    #[test]
    fn test_identity_association() {
        let regions = [region(0.0, 0.0, 10.0, 10.0), region(50.0, 50.0, 60.0, 60.0)];
        for policy in [OverlapPolicy::Shared, OverlapPolicy::Exclusive, OverlapPolicy::Optimal] {
            let assoc = associate(&regions, &regions, policy);
            assert_eq!(assoc.pairs, vec![(0, 0), (1, 1)]);
            assert_eq!(assoc.overlap_matches, 2);
            assert!(assoc.unmatched_truth.is_empty());
            assert!(assoc.unmatched_candidates.is_empty());
        }
    }

    #[test]
    fn test_empty_inputs() {
        let regions = [region(0.0, 0.0, 10.0, 10.0)];
        let assoc = associate(&regions, &[], OverlapPolicy::Shared);
        assert!(assoc.is_empty());
        assert_eq!(assoc.unmatched_truth, vec![0]);

        let assoc = associate(&[], &regions, OverlapPolicy::Optimal);
        assert!(assoc.is_empty());
        assert_eq!(assoc.unmatched_candidates, vec![0]);
    }

    #[test]
    fn test_overlap_tie_keeps_lowest_candidate() {
        let truth = [region(0.0, 0.0, 10.0, 10.0)];
        let candidates = [
            region(5.0, 0.0, 15.0, 10.0),
            region(-5.0, 0.0, 5.0, 10.0),
        ];
        let assoc = associate(&truth, &candidates, OverlapPolicy::Shared);
        assert_eq!(assoc.pairs, vec![(0, 0)]);
    }

    #[test]
    fn test_shared_policy_can_reuse_candidate() {
        let truth = [region(0.0, 0.0, 10.0, 10.0), region(2.0, 2.0, 12.0, 12.0)];
        let candidates = [region(1.0, 1.0, 11.0, 11.0), region(100.0, 100.0, 110.0, 110.0)];

        let assoc = associate(&truth, &candidates, OverlapPolicy::Shared);
        assert_eq!(assoc.pairs, vec![(0, 0), (1, 0)]);
        assert_eq!(assoc.unmatched_candidates, vec![1]);
        assert_eq!(has_unique_indices(&assoc.pairs), (true, false));
    }

    #[test]
    fn test_exclusive_policy_falls_back_to_distance() {
        let truth = [region(0.0, 0.0, 10.0, 10.0), region(2.0, 2.0, 12.0, 12.0)];
        let candidates = [region(1.0, 1.0, 11.0, 11.0), region(100.0, 100.0, 110.0, 110.0)];

        let assoc = associate(&truth, &candidates, OverlapPolicy::Exclusive);
        assert_eq!(assoc.pairs, vec![(0, 0), (1, 1)]);
        assert_eq!(assoc.overlap_matches, 1);
        assert_eq!(assoc.distance_pairs(), &[(1, 1)]);
        assert_eq!(has_unique_indices(&assoc.pairs), (true, true));
    }

    #[test]
    fn test_optimal_policy_swaps_greedy_choice() {
        let truth = [region(0.0, 0.0, 10.0, 10.0), region(6.0, 0.0, 16.0, 10.0)];
        let candidates = [region(5.0, 0.0, 15.0, 10.0), region(-8.0, 0.0, 2.0, 10.0)];

        // Greedy: truth 0 takes candidate 0 (0.33 > 0.11), truth 1 has no
        // overlap left and falls back to the distance phase.
        let greedy = associate(&truth, &candidates, OverlapPolicy::Exclusive);
        assert_eq!(greedy.pairs, vec![(0, 0), (1, 1)]);
        assert_eq!(greedy.overlap_matches, 1);

        let optimal = associate(&truth, &candidates, OverlapPolicy::Optimal);
        assert_eq!(optimal.pairs, vec![(0, 1), (1, 0)]);
        assert_eq!(optimal.overlap_matches, 2);
    }

    #[test]
    fn test_distance_phase_picks_nearest_remaining() {
        let truth = [region(0.0, 0.0, 10.0, 10.0), region(200.0, 0.0, 210.0, 10.0)];
        let candidates = [
            region(400.0, 0.0, 410.0, 10.0),
            region(215.0, 0.0, 225.0, 10.0),
            region(30.0, 0.0, 40.0, 10.0),
        ];
        let assoc = associate(&truth, &candidates, OverlapPolicy::Shared);
        assert_eq!(assoc.overlap_matches, 0);
        assert_eq!(assoc.pairs, vec![(0, 2), (1, 1)]);
        assert_eq!(assoc.unmatched_candidates, vec![0]);
    }

    #[test]
    fn test_distance_phase_has_no_threshold() {
        let truth = [region(0.0, 0.0, 1.0, 1.0)];
        let candidates = [region(10_000.0, 10_000.0, 10_001.0, 10_001.0)];
        let assoc = associate(&truth, &candidates, OverlapPolicy::Shared);
        assert_eq!(assoc.pairs, vec![(0, 0)]);
    }

    #[test]
    fn test_drifted_region_matches_by_overlap_not_identity() {
        // Previous frame: objects A and B. Object 0 drifted exactly onto B's
        // old position, object 1 wandered away from everything.
        let previous = [region(0.0, 0.0, 10.0, 10.0), region(50.0, 50.0, 60.0, 60.0)];
        let current = [region(50.0, 50.0, 60.0, 60.0), region(90.0, 0.0, 100.0, 10.0)];

        let assoc = associate(&previous, &current, OverlapPolicy::Shared);
        assert_eq!(assoc.pairs, vec![(1, 0), (0, 1)]);
        assert_eq!(assoc.overlap_matches, 1);
    }

    #[test]
    fn test_more_detections_than_truth() {
        // One ground truth region, two detections that never overlap each other
        let detections = [region(0.0, 0.0, 10.0, 10.0), region(40.0, 40.0, 50.0, 50.0)];
        let truth = [region(2.0, 2.0, 12.0, 12.0)];

        let assoc = associate(&detections, &truth, OverlapPolicy::Shared);
        assert_eq!(assoc.pairs, vec![(0, 0)]);
        assert_eq!(detections.len() - assoc.len(), 1);

        // Neither overlaps: the distance phase still covers exactly one
        let truth = [region(100.0, 100.0, 110.0, 110.0)];
        let assoc = associate(&detections, &truth, OverlapPolicy::Shared);
        assert_eq!(assoc.pairs, vec![(0, 0)]);
        assert_eq!(assoc.overlap_matches, 0);
        assert_eq!(assoc.unmatched_truth, vec![1]);
    }
}
