//! Anamorphic policies and per-policy geometry resolution.
//!
//! Each [`AnamorphicMode`] variant has its own resolution function taking
//! the cropped source [`Frame`] and the caller's [`Request`]. They share no
//! conditionals; [`AnamorphicMode::resolve`] only dispatches.
//!
//! # Example
//!
//! ```
//! use picture_geometry::{AnamorphicMode, Crop, PixelAspect, Request, Size, SourceDescriptor};
//!
//! let source = SourceDescriptor::new(720, 480, PixelAspect::new(10, 11)).unwrap();
//! let geometry = AnamorphicMode::Strict
//!     .resolve(&source, &Crop::NONE, &Request::default())
//!     .unwrap();
//!
//! // 720 × 10/11 = 654.5… → 655
//! assert_eq!(geometry.display, Size::new(655, 480));
//! assert_eq!(geometry.storage, Size::new(720, 480));
//! ```

use num_traits::Float;

use crate::GeometryError;
use crate::crop::Crop;
use crate::modulus::Modulus;
use crate::source::{PixelAspect, Size, SourceDescriptor};

/// How storage size, display size and pixel aspect are derived.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnamorphicMode {
    /// Square-pixel output. Width and height are cross-derived from the
    /// source aspect ratio when aspect is maintained.
    #[default]
    None,
    /// Keep the source storage size and pixel aspect exactly.
    Strict,
    /// Caller picks the width; height and pixel aspect follow, both axes
    /// aligned to the modulus.
    Loose,
    /// Caller picks everything: storage size, display width, pixel aspect.
    Custom,
}

impl AnamorphicMode {
    /// Every mode, in presentation order.
    pub const ALL: [Self; 4] = [Self::None, Self::Strict, Self::Loose, Self::Custom];

    /// Resolve output geometry for a source under this mode.
    pub fn resolve(
        self,
        source: &SourceDescriptor,
        crop: &Crop,
        request: &Request,
    ) -> Result<Geometry, GeometryError> {
        let frame = Frame::new(source, crop)?;
        Ok(match self {
            Self::None => resolve_none(&frame, request),
            Self::Strict => resolve_strict(&frame),
            Self::Loose => resolve_loose(&frame, request),
            Self::Custom => resolve_custom(&frame, request),
        })
    }
}

/// Caller-chosen values feeding a resolution.
///
/// Which fields matter depends on the mode: `Strict` reads none of them,
/// `Loose` reads only the width.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Request {
    pub modulus: Modulus,
    /// Requested storage width.
    pub width: u32,
    /// Requested storage height.
    pub height: u32,
    /// Requested display width (`Custom` only).
    pub display_width: u32,
    /// Requested pixel aspect (`Custom` only).
    pub pixel_aspect: PixelAspect,
    /// Upper bound on storage width.
    pub max_width: Option<u32>,
    /// Upper bound on storage height.
    pub max_height: Option<u32>,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            modulus: Modulus::default(),
            width: 0,
            height: 0,
            display_width: 0,
            pixel_aspect: PixelAspect::SQUARE,
            max_width: None,
            max_height: None,
        }
    }
}

/// Resolved output geometry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Geometry {
    /// Encoded frame size.
    pub storage: Size,
    /// Size the frame should be presented at.
    pub display: Size,
    /// Output pixel aspect (`display ≈ storage × par`).
    pub pixel_aspect: PixelAspect,
}

impl Geometry {
    /// Zero-sized result for a missing or unusable source.
    pub const EMPTY: Self = Self {
        storage: Size::ZERO,
        display: Size::ZERO,
        pixel_aspect: PixelAspect::SQUARE,
    };

    pub const fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

/// The cropped source region that every formula starts from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Source size after cropping.
    pub cropped: Size,
    /// Source pixel aspect.
    pub pixel_aspect: PixelAspect,
}

impl Frame {
    /// Crop a source. Fails when the crop leaves nothing.
    pub fn new(source: &SourceDescriptor, crop: &Crop) -> Result<Self, GeometryError> {
        let cropped = crop.cropped(source.resolution());
        if cropped.is_empty() {
            return Err(GeometryError::CropExceedsSource);
        }
        Ok(Self {
            cropped,
            pixel_aspect: source.pixel_aspect(),
        })
    }

    /// Storage aspect ratio of the cropped region.
    pub fn storage_aspect(&self) -> f64 {
        self.cropped.width as f64 / self.cropped.height as f64
    }

    /// Width the cropped region would display at.
    pub fn source_display_width(&self) -> f64 {
        self.cropped.width as f64 * self.pixel_aspect.ratio()
    }

    /// Display width of the cropped region, rounded to whole pixels.
    pub fn rounded_display_width(&self) -> u32 {
        Float::round(self.source_display_width()) as u32
    }
}

/// Square pixels at the requested size.
pub fn resolve_none(_frame: &Frame, request: &Request) -> Geometry {
    let storage = Size::new(
        request.modulus.fit(request.width as f64, request.max_width),
        request.modulus.fit(request.height as f64, request.max_height),
    );
    Geometry {
        storage,
        display: storage,
        pixel_aspect: PixelAspect::SQUARE,
    }
}

/// Exact source geometry; no modulus, no bounds.
pub fn resolve_strict(frame: &Frame) -> Geometry {
    Geometry {
        storage: frame.cropped,
        display: Size::new(frame.rounded_display_width(), frame.cropped.height),
        pixel_aspect: frame.pixel_aspect,
    }
}

/// Modulus-aligned storage; pixel aspect absorbs the rounding.
pub fn resolve_loose(frame: &Frame, request: &Request) -> Geometry {
    let m = request.modulus;
    let width = m.fit(request.width as f64, request.max_width);
    let height = m.fit(
        width as f64 / frame.storage_aspect() + 0.5,
        request.max_height,
    );

    // Film aspect = source display width / cropped height. Output display
    // width = output height × film aspect, and PAR = display / storage.
    let par_w = height as f64 * frame.source_display_width() / frame.cropped.height as f64;
    let par_h = width as f64;
    let mut display_width = width as f64 * par_w / par_h;
    if !display_width.is_finite() {
        display_width = 0.0;
    }

    let par = PixelAspect::from_ratio(
        height as u128 * frame.cropped.width as u128 * frame.pixel_aspect.width() as u128,
        frame.cropped.height as u128 * frame.pixel_aspect.height() as u128 * width as u128,
    )
    .unwrap_or(PixelAspect::SQUARE);

    Geometry {
        storage: Size::new(width, height),
        display: Size::new(Float::trunc(display_width) as u32, height),
        pixel_aspect: par,
    }
}

/// Storage from the request, display width and pixel aspect as given.
pub fn resolve_custom(_frame: &Frame, request: &Request) -> Geometry {
    let m = request.modulus;
    let height = m.fit(request.height as f64, request.max_height);
    Geometry {
        storage: Size::new(m.fit(request.width as f64, request.max_width), height),
        display: Size::new(request.display_width, height),
        pixel_aspect: request.pixel_aspect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(w: u32, h: u32, par: PixelAspect) -> SourceDescriptor {
        SourceDescriptor::new(w, h, par).unwrap()
    }

    fn hd() -> SourceDescriptor {
        source(1920, 1080, PixelAspect::SQUARE)
    }

    fn request(width: u32, height: u32) -> Request {
        Request {
            width,
            height,
            max_width: Some(1920),
            max_height: Some(1080),
            ..Request::default()
        }
    }

    // ── Frame ───────────────────────────────────────────────────────────

    #[test]
    fn frame_rejects_crop_that_leaves_nothing() {
        let crop = Crop::new(540, 540, 0, 0);
        assert_eq!(
            Frame::new(&hd(), &crop),
            Err(GeometryError::CropExceedsSource)
        );
    }

    #[test]
    fn frame_display_width_uses_par() {
        let f = Frame::new(&source(720, 480, PixelAspect::new(32, 27)), &Crop::NONE).unwrap();
        // 720 × 32/27 = 853.33…
        assert_eq!(f.rounded_display_width(), 853);
    }

    // ── Strict ──────────────────────────────────────────────────────────

    #[test]
    fn strict_square_source() {
        let g = AnamorphicMode::Strict
            .resolve(&hd(), &Crop::NONE, &Request::default())
            .unwrap();
        assert_eq!(g.display, Size::new(1920, 1080));
        assert_eq!(g.display.to_string(), "1920x1080");
    }

    #[test]
    fn strict_ntsc_par() {
        let g = AnamorphicMode::Strict
            .resolve(
                &source(720, 480, PixelAspect::new(10, 11)),
                &Crop::NONE,
                &Request::default(),
            )
            .unwrap();
        assert_eq!(g.display.to_string(), "655x480");
        assert_eq!(g.pixel_aspect, PixelAspect::new(10, 11));
    }

    #[test]
    fn strict_ignores_modulus_and_request() {
        let crop = Crop::new(2, 2, 6, 0);
        let g = AnamorphicMode::Strict
            .resolve(&hd(), &crop, &request(640, 360))
            .unwrap();
        // 1914 × 1076: neither is a multiple of 16.
        assert_eq!(g.storage, Size::new(1914, 1076));
        assert_eq!(g.display, Size::new(1914, 1076));
    }

    // ── Loose ───────────────────────────────────────────────────────────

    #[test]
    fn loose_width_1280_on_hd() {
        let g = AnamorphicMode::Loose
            .resolve(&hd(), &Crop::NONE, &request(1280, 0))
            .unwrap();
        // 1280 / (1920/1080) + 0.5 = 720.5 → 720
        assert_eq!(g.storage, Size::new(1280, 720));
        assert_eq!(g.display.to_string(), "1280x720");
        assert_eq!(g.pixel_aspect, PixelAspect::SQUARE);
    }

    #[test]
    fn loose_rounds_width_to_modulus() {
        let g = AnamorphicMode::Loose
            .resolve(&hd(), &Crop::NONE, &request(1000, 0))
            .unwrap();
        assert_eq!(g.storage.width, 1008);
        assert_eq!(g.storage.height % 16, 0);
    }

    #[test]
    fn loose_anamorphic_source_keeps_display_aspect() {
        // DVD 16:9: 720×480 at 32:27, cropped 8 px each side.
        let src = source(720, 480, PixelAspect::new(32, 27));
        let crop = Crop::new(0, 0, 8, 8);
        let g = AnamorphicMode::Loose
            .resolve(
                &src,
                &crop,
                &Request {
                    width: 704,
                    max_width: Some(720),
                    max_height: Some(480),
                    ..Request::default()
                },
            )
            .unwrap();
        assert_eq!(g.storage, Size::new(704, 480));
        // 704 × 32/27 = 834.37…
        assert_eq!(g.display, Size::new(834, 480));
        assert_eq!(g.pixel_aspect, PixelAspect::new(32, 27));
    }

    #[test]
    fn loose_height_respects_bound() {
        // 1920 wide on a 4:3 crop would want 1440 rows.
        let src = source(1920, 1080, PixelAspect::SQUARE);
        let crop = Crop::new(0, 0, 240, 240);
        let g = AnamorphicMode::Loose
            .resolve(&src, &crop, &request(1920, 0))
            .unwrap();
        assert_eq!(g.storage.height, 1072);
    }

    // ── Custom ──────────────────────────────────────────────────────────

    #[test]
    fn custom_height_1000_mod16() {
        let mut r = request(1280, 1000);
        r.display_width = 1500;
        r.pixel_aspect = PixelAspect::new(4, 3);
        let g = AnamorphicMode::Custom.resolve(&hd(), &Crop::NONE, &r).unwrap();
        assert_eq!(g.storage, Size::new(1280, 1008));
        assert_eq!(g.display, Size::new(1500, 1008));
        assert_eq!(g.pixel_aspect, PixelAspect::new(4, 3));
    }

    // ── None ────────────────────────────────────────────────────────────

    #[test]
    fn none_display_matches_storage() {
        let g = AnamorphicMode::None
            .resolve(&hd(), &Crop::NONE, &request(1280, 720))
            .unwrap();
        assert_eq!(g.storage, Size::new(1280, 720));
        assert_eq!(g.display, g.storage);
        assert!(g.pixel_aspect.is_square());
    }

    #[test]
    fn none_fits_stale_request_to_modulus() {
        let mut r = request(1279, 719);
        r.modulus = Modulus::Eight;
        let g = AnamorphicMode::None.resolve(&hd(), &Crop::NONE, &r).unwrap();
        assert_eq!(g.storage, Size::new(1280, 720));
    }
}
