//! Source video description: resolution, pixel aspect, detected crop bars.

use core::fmt;

use crate::GeometryError;
use crate::crop::Crop;

/// Width × height dimensions in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Zero-sized.
    pub const ZERO: Self = Self::new(0, 0);

    /// Create a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either axis is zero.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Formats as `WxH`.
impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Pixel aspect ratio. Display width = storage width × `width / height`.
///
/// Both components are always positive. Serializes as `[width, height]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "[u32; 2]", into = "[u32; 2]")
)]
pub struct PixelAspect {
    width: u32,
    height: u32,
}

impl PixelAspect {
    /// Square pixels.
    pub const SQUARE: Self = Self {
        width: 1,
        height: 1,
    };

    /// Create a pixel aspect ratio. A zero component means "unknown" and
    /// yields [`SQUARE`](Self::SQUARE).
    pub const fn new(width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            Self::SQUARE
        } else {
            Self { width, height }
        }
    }

    /// Build from an arbitrary rational, reduced to lowest terms and scaled
    /// down until both terms fit in `u32`. `None` if either term is zero.
    pub fn from_ratio(num: u128, den: u128) -> Option<Self> {
        if num == 0 || den == 0 {
            return None;
        }
        let g = gcd(num, den);
        let (mut n, mut d) = (num / g, den / g);
        while n > u32::MAX as u128 || d > u32::MAX as u128 {
            n >>= 1;
            d >>= 1;
        }
        if n == 0 || d == 0 {
            return None;
        }
        Some(Self {
            width: n as u32,
            height: d as u32,
        })
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    /// `width / height` as a float.
    pub fn ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    pub const fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Replace the horizontal term. Zero becomes 1.
    pub const fn with_width(self, width: u32) -> Self {
        Self {
            width: if width == 0 { 1 } else { width },
            height: self.height,
        }
    }

    /// Replace the vertical term. Zero becomes 1.
    pub const fn with_height(self, height: u32) -> Self {
        Self {
            width: self.width,
            height: if height == 0 { 1 } else { height },
        }
    }
}

impl Default for PixelAspect {
    fn default() -> Self {
        Self::SQUARE
    }
}

impl From<[u32; 2]> for PixelAspect {
    fn from([width, height]: [u32; 2]) -> Self {
        Self::new(width, height)
    }
}

impl From<PixelAspect> for [u32; 2] {
    fn from(par: PixelAspect) -> Self {
        [par.width, par.height]
    }
}

impl fmt::Display for PixelAspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// A selected source title, as reported by the scanner.
///
/// Immutable once built. A new selection replaces it wholesale.
///
/// ```
/// use picture_geometry::{Crop, PixelAspect, SourceDescriptor};
///
/// let source = SourceDescriptor::new(720, 480, PixelAspect::new(32, 27))
///     .unwrap()
///     .with_auto_crop(Crop::new(0, 0, 8, 8));
///
/// assert_eq!(source.to_string(), "720x480, Aspect Ratio: 1.78");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceDescriptor {
    resolution: Size,
    pixel_aspect: PixelAspect,
    auto_crop: Crop,
}

impl SourceDescriptor {
    /// Describe a source. Zero width or height is rejected.
    pub fn new(
        width: u32,
        height: u32,
        pixel_aspect: PixelAspect,
    ) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::ZeroSourceDimension);
        }
        Ok(Self {
            resolution: Size::new(width, height),
            pixel_aspect,
            auto_crop: Crop::NONE,
        })
    }

    /// Attach the letterbox bars found by crop detection.
    ///
    /// The crop is made valid for this source (even edges, opposite edges
    /// summing to less than the frame).
    pub fn with_auto_crop(mut self, crop: Crop) -> Self {
        self.auto_crop = crop.clamped_to(self.resolution);
        self
    }

    pub const fn resolution(&self) -> Size {
        self.resolution
    }

    pub const fn width(&self) -> u32 {
        self.resolution.width
    }

    pub const fn height(&self) -> u32 {
        self.resolution.height
    }

    pub const fn pixel_aspect(&self) -> PixelAspect {
        self.pixel_aspect
    }

    /// Crop suggested by letterbox detection.
    pub const fn auto_crop(&self) -> Crop {
        self.auto_crop
    }

    /// Display aspect ratio of the uncropped frame:
    /// `(width × par_w) / (height × par_h)`.
    pub fn display_aspect_ratio(&self) -> f64 {
        (self.resolution.width as f64 * self.pixel_aspect.width as f64)
            / (self.resolution.height as f64 * self.pixel_aspect.height as f64)
    }
}

/// Source info line shown next to the picture settings.
impl fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, Aspect Ratio: {:.2}",
            self.resolution,
            self.display_aspect_ratio()
        )
    }
}
