//! Edge cropping applied to the source frame before geometry resolution.
//!
//! Every edge stays even so the crop never splits a chroma-subsampled
//! pixel pair, and opposite edges always leave at least one row or column.

use crate::source::Size;

/// Pixels removed from each edge of the source frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Crop {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

/// One edge of a [`Crop`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CropEdge {
    Top,
    Bottom,
    Left,
    Right,
}

impl CropEdge {
    /// The edge on the other side of the same axis.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Whether this edge trims width (left/right) rather than height.
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

impl Crop {
    /// No cropping.
    pub const NONE: Self = Self::new(0, 0, 0, 0);

    /// Create a crop from its four edges (no correction applied).
    pub const fn new(top: u32, bottom: u32, left: u32, right: u32) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    pub const fn edge(&self, edge: CropEdge) -> u32 {
        match edge {
            CropEdge::Top => self.top,
            CropEdge::Bottom => self.bottom,
            CropEdge::Left => self.left,
            CropEdge::Right => self.right,
        }
    }

    fn edge_mut(&mut self, edge: CropEdge) -> &mut u32 {
        match edge {
            CropEdge::Top => &mut self.top,
            CropEdge::Bottom => &mut self.bottom,
            CropEdge::Left => &mut self.left,
            CropEdge::Right => &mut self.right,
        }
    }

    /// Whether every edge is zero.
    pub const fn is_none(&self) -> bool {
        self.top == 0 && self.bottom == 0 && self.left == 0 && self.right == 0
    }

    /// Source dimensions left after cropping. Saturates at zero.
    pub const fn cropped(&self, source: Size) -> Size {
        Size::new(
            source
                .width
                .saturating_sub(self.left)
                .saturating_sub(self.right),
            source
                .height
                .saturating_sub(self.top)
                .saturating_sub(self.bottom),
        )
    }

    /// Whether edges are even and opposite edges leave at least one pixel.
    pub fn fits(&self, source: Size) -> bool {
        let even = (self.top | self.bottom | self.left | self.right) % 2 == 0;
        even && (self.left as u64 + self.right as u64) < source.width as u64
            && (self.top as u64 + self.bottom as u64) < source.height as u64
    }

    /// Set one edge the way an interactive edit does.
    ///
    /// The value goes through [`correct_crop`] against the edge's previous
    /// value, then is clamped to the largest even value that keeps the
    /// opposite-edge sum below the source dimension. Pass `None` when no
    /// source is known; only the evenness correction applies then.
    pub fn with_edge(mut self, edge: CropEdge, value: u32, source: Option<Size>) -> Self {
        let corrected = correct_crop(self.edge(edge), value);
        let limit = source.map(|s| {
            let dim = if edge.is_horizontal() { s.width } else { s.height };
            even_floor(dim.saturating_sub(1).saturating_sub(self.edge(edge.opposite())))
        });
        *self.edge_mut(edge) = match limit {
            Some(limit) => corrected.min(limit),
            None => corrected,
        };
        self
    }

    /// Round every odd edge down to even. Used when no source is known to
    /// clamp against.
    pub const fn evened(self) -> Self {
        Self {
            top: even_floor(self.top),
            bottom: even_floor(self.bottom),
            left: even_floor(self.left),
            right: even_floor(self.right),
        }
    }

    /// Make a crop adopted wholesale valid for `source`.
    ///
    /// Odd edges round down. Within each pair the first edge (top, left)
    /// keeps priority and the second is clamped against it.
    pub fn clamped_to(self, source: Size) -> Self {
        let (top, bottom) = clamp_pair(self.top, self.bottom, source.height);
        let (left, right) = clamp_pair(self.left, self.right, source.width);
        Self {
            top,
            bottom,
            left,
            right,
        }
    }
}

fn clamp_pair(first: u32, second: u32, dim: u32) -> (u32, u32) {
    let room = even_floor(dim.saturating_sub(1));
    let first = even_floor(first).min(room);
    let second = even_floor(second).min(even_floor(dim.saturating_sub(1) - first));
    (first, second)
}

const fn even_floor(v: u32) -> u32 {
    v & !1
}

/// Keep a crop edge even after an edit.
///
/// An even `new_value` passes through. An odd one moves one unit further
/// from `old_value`: up when the edit increased the edge, down otherwise.
/// Repeated spinner steps therefore never bounce at odd values.
///
/// ```
/// use picture_geometry::correct_crop;
///
/// assert_eq!(correct_crop(4, 6), 6);
/// assert_eq!(correct_crop(4, 5), 6);
/// assert_eq!(correct_crop(6, 5), 4);
/// ```
pub const fn correct_crop(old_value: u32, new_value: u32) -> u32 {
    if new_value % 2 == 0 {
        return new_value;
    }
    if new_value > old_value {
        match new_value.checked_add(1) {
            Some(v) => v,
            None => new_value - 1,
        }
    } else {
        new_value - 1
    }
}
