use image::{GrayImage, Luma};
use nalgebra::Point2;
use ndarray::Array2;

/// Axis-aligned bounding region given by its min and max corners.
///
/// Supports two common bounding box formats:
/// - TLBR: Top-Left X, Top-Left Y, Bottom-Right X, Bottom-Right Y
/// - TLWH: Top-Left X, Top-Left Y, Width, Height
///
/// Zero-area regions are allowed and never overlap anything.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Region {
    /// Min corner x coordinate
    pub x1: f32,
    /// Min corner y coordinate
    pub y1: f32,
    /// Max corner x coordinate
    pub x2: f32,
    /// Max corner y coordinate
    pub y2: f32,
}

impl Region {
    /// Create a region from TLBR format. Corners are normalised so that the
    /// min corner never exceeds the max corner.
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// Create a region from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn from_tlwh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::from_tlbr(x, y, x + width, y + height)
    }

    /// Componentwise min/max of a point cloud, `None` when it is empty.
    pub fn bounding<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point2<f32>>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let init = Self {
            x1: first.x,
            y1: first.y,
            x2: first.x,
            y2: first.y,
        };
        Some(iter.fold(init, |r, p| Self {
            x1: r.x1.min(p.x),
            y1: r.y1.min(p.y),
            x2: r.x2.max(p.x),
            y2: r.y2.max(p.y),
        }))
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    /// Convert to TLWH format: (x, y, width, height).
    #[inline]
    pub fn to_tlwh(&self) -> [f32; 4] {
        [self.x1, self.y1, self.width(), self.height()]
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Intersection over union with another region.
    ///
    /// Disjoint regions short-circuit to 0.0 before any area is computed, and
    /// an empty union (two coincident zero-area regions) is also 0.0.
    pub fn overlap_ratio(&self, other: &Region) -> f32 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);
        if x2 < x1 || y2 < y1 {
            return 0.0;
        }

        let inter_area = (x2 - x1) * (y2 - y1);
        let union_area = self.area() + other.area() - inter_area;

        if union_area > 0.0 {
            inter_area / union_area
        } else {
            0.0
        }
    }

    /// Smallest positive axis-aligned gap between the borders of two regions.
    ///
    /// Only meaningful for regions that do not overlap. Regions that overlap
    /// or touch have no positive gap and report 0.0.
    pub fn border_distance(&self, other: &Region) -> f32 {
        [
            other.x1 - self.x2,
            self.x1 - other.x2,
            other.y1 - self.y2,
            self.y1 - other.y2,
        ]
        .into_iter()
        .filter(|gap| *gap > 0.0)
        .reduce(f32::min)
        .unwrap_or(0.0)
    }

    /// Binary mask of the region over a `width` x `height` frame: 255 inside
    /// `[x1, x2) x [y1, y2)`, 0 elsewhere. The region is clipped to the frame.
    pub fn mask(&self, width: u32, height: u32) -> GrayImage {
        let clip = |v: f32, max: u32| (v.max(0.0) as u32).min(max);
        let (x1, x2) = (clip(self.x1, width), clip(self.x2, width));
        let (y1, y2) = (clip(self.y1, height), clip(self.y2, height));

        let mut mask = GrayImage::new(width, height);
        for y in y1..y2 {
            for x in x1..x2 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        mask
    }

    /// Corners rounded to whole pixels, min corner first.
    pub fn to_pixels(&self) -> [i64; 4] {
        self.to_tlbr().map(|v| v.round() as i64)
    }
}

/// Overlap ratio matrix of shape (M, N) between `boxes_a` and `boxes_b`.
pub fn overlap_matrix(boxes_a: &[Region], boxes_b: &[Region]) -> Array2<f32> {
    let mut ratios = Array2::zeros((boxes_a.len(), boxes_b.len()));
    for (i, a) in boxes_a.iter().enumerate() {
        for (j, b) in boxes_b.iter().enumerate() {
            ratios[[i, j]] = a.overlap_ratio(b);
        }
    }
    ratios
}
