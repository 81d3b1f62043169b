//! Picture settings state and its pure edit transition.
//!
//! [`GeometryState`] holds the raw field values a picture-settings form
//! shows. [`resolve`] applies one [`Edit`] and re-derives every dependent
//! field, so the state is consistent after each call no matter what order
//! edits arrive in.
//!
//! The raw `width`/`height` fields use `0` as a "derive on read" sentinel:
//! `Strict` zeroes both, `Loose` zeroes the height. Resolved dimensions
//! always come from [`GeometryState::geometry`].

use core::fmt;

use num_traits::Float;

use crate::anamorphic::{AnamorphicMode, Frame, Geometry, Request};
use crate::crop::{Crop, CropEdge};
use crate::modulus::Modulus;
use crate::source::{PixelAspect, Size, SourceDescriptor};

/// Whether a source has been selected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Initial state; geometry resolves to zero.
    NoSource,
    /// A source is loaded; any later selection stays here.
    SourceLoaded,
}

/// A single-field edit, as a form would issue it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Edit {
    /// Storage width.
    Width(u32),
    /// Storage height.
    Height(u32),
    /// Modulus; corrected to the nearest of 2, 4, 8, 16.
    Modulus(u32),
    /// Switch anamorphic mode, re-deriving everything.
    Mode(AnamorphicMode),
    MaintainAspectRatio(bool),
    /// One crop edge. Marks the crop as custom.
    Crop(CropEdge, u32),
    /// Replace the whole crop. Marks the crop as custom.
    SetCrop(Crop),
    /// Go back to the source's detected crop.
    AutoCrop,
    /// Display width (`Custom` only).
    DisplayWidth(u32),
    /// Pixel aspect numerator (`Custom` only).
    PixelAspectWidth(u32),
    /// Pixel aspect denominator (`Custom` only).
    PixelAspectHeight(u32),
    /// Inherited size limits. `None` or zero removes a limit.
    MaxSize {
        width: Option<u32>,
        height: Option<u32>,
    },
    /// A new source title. `crop` is an explicit crop from the active
    /// configuration; without one the detected crop is used.
    SelectSource {
        source: SourceDescriptor,
        crop: Option<Crop>,
    },
    /// Forget the source and every setting.
    Reset,
}

/// Which fields the caller may edit under the current mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldAccess {
    pub width: bool,
    pub height: bool,
    pub modulus: bool,
    pub maintain_aspect_ratio: bool,
    pub display_width: bool,
    pub pixel_aspect: bool,
}

impl FieldAccess {
    pub const fn for_mode(mode: AnamorphicMode) -> Self {
        let custom = matches!(mode, AnamorphicMode::Custom);
        Self {
            width: !matches!(mode, AnamorphicMode::Strict),
            height: matches!(mode, AnamorphicMode::None | AnamorphicMode::Custom),
            modulus: !matches!(mode, AnamorphicMode::Strict),
            maintain_aspect_ratio: matches!(mode, AnamorphicMode::None | AnamorphicMode::Custom),
            display_width: custom,
            pixel_aspect: custom,
        }
    }
}

/// The display-size label: `WxH`, or a placeholder with no source.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DisplayLabel {
    NoSource,
    Size(Size),
}

impl fmt::Display for DisplayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSource => f.write_str("No source"),
            Self::Size(size) => write!(f, "{size}"),
        }
    }
}

/// Working picture settings for one edit session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GeometryState {
    pub source: Option<SourceDescriptor>,
    pub crop: Crop,
    /// Crop came from the user or a configuration rather than detection.
    pub custom_crop: bool,
    pub mode: AnamorphicMode,
    pub modulus: Modulus,
    pub maintain_aspect_ratio: bool,
    /// Raw storage width field. `0` = derive from source.
    pub width: u32,
    /// Raw storage height field. `0` = derive from source.
    pub height: u32,
    pub display_width: u32,
    pub pixel_aspect: PixelAspect,
    /// Limit inherited from a configuration.
    pub max_width: Option<u32>,
    /// Limit inherited from a configuration.
    pub max_height: Option<u32>,
}

impl Default for GeometryState {
    fn default() -> Self {
        Self {
            source: None,
            crop: Crop::NONE,
            custom_crop: false,
            mode: AnamorphicMode::None,
            modulus: Modulus::Sixteen,
            maintain_aspect_ratio: true,
            width: 0,
            height: 0,
            display_width: 0,
            pixel_aspect: PixelAspect::SQUARE,
            max_width: None,
            max_height: None,
        }
    }
}

impl GeometryState {
    pub const fn phase(&self) -> Phase {
        match self.source {
            Some(_) => Phase::SourceLoaded,
            None => Phase::NoSource,
        }
    }

    /// Effective width limit: the smaller of the source width and the
    /// inherited limit.
    pub fn max_width(&self) -> Option<u32> {
        min_bound(self.source.map(|s| s.width()), self.max_width)
    }

    /// Effective height limit: the smaller of the source height and the
    /// inherited limit.
    pub fn max_height(&self) -> Option<u32> {
        min_bound(self.source.map(|s| s.height()), self.max_height)
    }

    /// Source size after cropping.
    pub fn cropped(&self) -> Option<Size> {
        self.source.map(|s| self.crop.cropped(s.resolution()))
    }

    /// Inputs for the resolver.
    pub fn request(&self) -> Request {
        Request {
            modulus: self.modulus,
            width: self.width,
            height: self.height,
            display_width: self.display_width,
            pixel_aspect: self.pixel_aspect,
            max_width: self.max_width(),
            max_height: self.max_height(),
        }
    }

    /// Resolved output geometry, computed fresh from source, crop and the
    /// current fields. Zero-sized when there is no usable source.
    pub fn geometry(&self) -> Geometry {
        let Some(source) = self.source else {
            return Geometry::EMPTY;
        };
        match self.mode.resolve(&source, &self.crop, &self.request()) {
            Ok(geometry) => geometry,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_err, "geometry unresolvable, reporting empty frame");
                Geometry::EMPTY
            }
        }
    }

    pub fn display_label(&self) -> DisplayLabel {
        match self.source {
            None => DisplayLabel::NoSource,
            Some(_) => DisplayLabel::Size(self.geometry().display),
        }
    }

    pub const fn field_access(&self) -> FieldAccess {
        FieldAccess::for_mode(self.mode)
    }

    fn frame(&self) -> Option<Frame> {
        let source = self.source?;
        Frame::new(&source, &self.crop).ok()
    }

    fn fit_width(&self, value: f64) -> u32 {
        self.modulus.fit(value, self.max_width())
    }

    fn fit_height(&self, value: f64) -> u32 {
        self.modulus.fit(value, self.max_height())
    }

    // ── Edit paths ──────────────────────────────────────────────────────

    fn set_width(&mut self, requested: u32) {
        let width = clamp_to(requested, self.max_width());
        let Some(frame) = self.frame() else {
            match self.mode {
                AnamorphicMode::Strict => (self.width, self.height) = (0, 0),
                AnamorphicMode::Loose => (self.width, self.height) = (width, 0),
                AnamorphicMode::None | AnamorphicMode::Custom => self.width = width,
            }
            return;
        };
        match self.mode {
            AnamorphicMode::None => {
                self.width = self.fit_width(width as f64);
                if !self.maintain_aspect_ratio {
                    self.height = self.fit_height(self.height as f64);
                    return;
                }
                let derived = height_for_width(&frame, self.width);
                self.height = self.fit_height(derived);
                // Height hit its limit; shrink the width to match.
                if exceeds(derived, self.max_height()) {
                    self.width = self.fit_width(width_for_height(&frame, self.height));
                }
            }
            AnamorphicMode::Strict => {
                self.width = 0;
                self.height = 0;
            }
            AnamorphicMode::Loose => {
                self.width = self.fit_width(width as f64);
                self.height = 0;
            }
            AnamorphicMode::Custom => {
                self.width = self.fit_width(width as f64);
                self.height = self.fit_height(self.height as f64);
            }
        }
    }

    fn set_height(&mut self, requested: u32) {
        let height = clamp_to(requested, self.max_height());
        let Some(frame) = self.frame() else {
            if matches!(self.mode, AnamorphicMode::None | AnamorphicMode::Custom) {
                self.height = height;
            }
            return;
        };
        match self.mode {
            AnamorphicMode::None => {
                self.height = self.fit_height(height as f64);
                if self.maintain_aspect_ratio {
                    let derived = width_for_height(&frame, self.height);
                    self.width = self.fit_width(derived);
                    if exceeds(derived, self.max_width()) {
                        self.height = self.fit_height(height_for_width(&frame, self.width));
                    }
                }
            }
            AnamorphicMode::Custom => self.height = self.fit_height(height as f64),
            // Derived from the width; not caller-editable.
            AnamorphicMode::Strict | AnamorphicMode::Loose => {}
        }
    }

    /// Re-derive every field for the current mode from source and crop.
    fn rederive(&mut self) {
        match self.mode {
            AnamorphicMode::Strict => {
                self.width = 0;
                self.height = 0;
                return;
            }
            AnamorphicMode::Loose => self.height = 0,
            AnamorphicMode::None | AnamorphicMode::Custom => {}
        }
        let Some(frame) = self.frame() else {
            return;
        };
        match self.mode {
            AnamorphicMode::None => {
                self.height = frame.cropped.height;
                self.set_width(frame.cropped.width);
            }
            AnamorphicMode::Loose => self.set_width(frame.cropped.width),
            AnamorphicMode::Custom => {
                self.maintain_aspect_ratio = true;
                self.height = frame.cropped.height;
                self.set_width(frame.cropped.width);
                self.display_width = frame.rounded_display_width();
                self.pixel_aspect = frame.pixel_aspect;
            }
            AnamorphicMode::Strict => {}
        }
    }

    fn crop_changed(&mut self) {
        if self.mode == AnamorphicMode::None && self.maintain_aspect_ratio {
            self.set_width(self.width);
        }
    }

    fn set_display_width(&mut self, value: u32) {
        if self.mode != AnamorphicMode::Custom {
            return;
        }
        self.display_width = value;
        if self.maintain_aspect_ratio
            && let Some(par) = PixelAspect::from_ratio(value as u128, self.width as u128)
        {
            self.pixel_aspect = par;
        }
    }

    fn set_pixel_aspect(&mut self, par: PixelAspect) {
        if self.mode != AnamorphicMode::Custom {
            return;
        }
        self.pixel_aspect = par;
        if self.maintain_aspect_ratio && self.width > 0 {
            self.display_width = Float::round(self.width as f64 * par.ratio()) as u32;
        }
    }
}

/// Apply one edit to a state, returning the re-derived state.
///
/// Out-of-range values are corrected rather than rejected: sizes clamp to
/// the effective limits, crop edges stay even and inside the frame, the
/// modulus snaps to an allowed value.
///
/// ```
/// use picture_geometry::{AnamorphicMode, Edit, GeometryState, PixelAspect, SourceDescriptor, resolve};
///
/// let source = SourceDescriptor::new(1920, 1080, PixelAspect::SQUARE).unwrap();
/// let state = resolve(&GeometryState::default(), Edit::SelectSource { source, crop: None });
/// let state = resolve(&state, Edit::Width(1280));
///
/// assert_eq!((state.width, state.height), (1280, 720));
/// assert_eq!(state.mode, AnamorphicMode::None);
/// ```
pub fn resolve(state: &GeometryState, edit: Edit) -> GeometryState {
    let mut next = *state;
    match edit {
        Edit::Width(width) => next.set_width(width),
        Edit::Height(height) => next.set_height(height),
        Edit::Modulus(raw) => {
            next.modulus = Modulus::nearest(raw);
            #[cfg(feature = "tracing")]
            if next.modulus.get() != raw {
                tracing::debug!(raw, corrected = next.modulus.get(), "modulus corrected");
            }
            next.set_width(next.width);
        }
        Edit::Mode(mode) => {
            next.mode = mode;
            if matches!(mode, AnamorphicMode::None | AnamorphicMode::Strict) {
                next.modulus = Modulus::Sixteen;
            }
            next.rederive();
        }
        Edit::MaintainAspectRatio(on) => {
            next.maintain_aspect_ratio = on;
            next.set_width(next.width);
        }
        Edit::Crop(edge, value) => {
            next.crop = next
                .crop
                .with_edge(edge, value, next.source.map(|s| s.resolution()));
            next.custom_crop = true;
            next.crop_changed();
        }
        Edit::SetCrop(crop) => {
            next.crop = match next.source {
                Some(source) => crop.clamped_to(source.resolution()),
                None => crop.evened(),
            };
            next.custom_crop = true;
            next.crop_changed();
        }
        Edit::AutoCrop => {
            next.crop = next.source.map_or(Crop::NONE, |s| s.auto_crop());
            next.custom_crop = false;
            next.crop_changed();
        }
        Edit::DisplayWidth(value) => next.set_display_width(value),
        Edit::PixelAspectWidth(value) => next.set_pixel_aspect(next.pixel_aspect.with_width(value)),
        Edit::PixelAspectHeight(value) => {
            next.set_pixel_aspect(next.pixel_aspect.with_height(value))
        }
        Edit::MaxSize { width, height } => {
            next.max_width = width;
            next.max_height = height;
            next.set_width(next.width);
            if let Some(bound) = next.max_height()
                && next.height > bound
            {
                next.set_height(bound);
            }
        }
        Edit::SelectSource { source, crop } => {
            next.source = Some(source);
            match crop {
                Some(crop) => {
                    next.crop = crop.clamped_to(source.resolution());
                    next.custom_crop = true;
                }
                None => {
                    next.crop = source.auto_crop();
                    next.custom_crop = false;
                }
            }
            next.maintain_aspect_ratio = true;
            next.rederive();
        }
        Edit::Reset => next = GeometryState::default(),
    }
    next
}

/// `width × (cropped_h × par_h) / (cropped_w × par_w)`, using the source
/// pixel aspect.
fn height_for_width(frame: &Frame, width: u32) -> f64 {
    let par = frame.pixel_aspect;
    (width as f64 * frame.cropped.height as f64 * par.height() as f64)
        / (frame.cropped.width as f64 * par.width() as f64)
}

fn width_for_height(frame: &Frame, height: u32) -> f64 {
    let par = frame.pixel_aspect;
    (height as f64 * frame.cropped.width as f64 * par.width() as f64)
        / (frame.cropped.height as f64 * par.height() as f64)
}

fn exceeds(value: f64, bound: Option<u32>) -> bool {
    bound.is_some_and(|max| value > max as f64)
}

fn min_bound(a: Option<u32>, b: Option<u32>) -> Option<u32> {
    let b = b.filter(|&v| v > 0);
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

fn clamp_to(value: u32, bound: Option<u32>) -> u32 {
    match bound {
        Some(max) if value > max => {
            #[cfg(feature = "tracing")]
            tracing::debug!(requested = value, bound = max, "dimension clamped to limit");
            max
        }
        _ => value,
    }
}
