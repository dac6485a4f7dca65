/// Running count of detections that could not be matched to ground truth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorAccumulator {
    total: u64,
    first_error_frame: Option<u32>,
}

impl ErrorAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `deficit` misses observed at `frame`. The first frame with a
    /// positive deficit is remembered and never overwritten.
    pub fn record(&mut self, frame: u32, deficit: usize) {
        if deficit == 0 {
            return;
        }
        self.total += deficit as u64;
        if self.first_error_frame.is_none() {
            self.first_error_frame = Some(frame);
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn first_error_frame(&self) -> Option<u32> {
        self.first_error_frame
    }
}
