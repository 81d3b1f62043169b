//! Stateful edit session over [`GeometryState`].
//!
//! [`PictureSettings`] applies each edit through [`resolve`], then diffs the
//! old and new state so the display layer knows which fields to refresh.
//! It never reports errors: bad input is corrected in place.

use crate::anamorphic::{AnamorphicMode, Geometry};
use crate::crop::{Crop, CropEdge};
use crate::source::SourceDescriptor;
use crate::state::{DisplayLabel, Edit, FieldAccess, GeometryState, resolve};

bitflags::bitflags! {
    /// Fields whose published value changed during an edit.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Changed: u16 {
        const SOURCE = 1 << 0;
        const MODE = 1 << 1;
        const MODULUS = 1 << 2;
        const MAINTAIN_ASPECT_RATIO = 1 << 3;
        const WIDTH = 1 << 4;
        const HEIGHT = 1 << 5;
        const CROP = 1 << 6;
        const DISPLAY_WIDTH = 1 << 7;
        const PIXEL_ASPECT = 1 << 8;
        const MAX_SIZE = 1 << 9;
        /// Resolved storage, display or pixel aspect.
        const GEOMETRY = 1 << 10;
        const DISPLAY_LABEL = 1 << 11;
        const FIELD_ACCESS = 1 << 12;
    }
}

/// What the display layer can see of a session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Published {
    state: GeometryState,
    geometry: Geometry,
    label: DisplayLabel,
    access: FieldAccess,
}

impl Published {
    fn of(state: &GeometryState) -> Self {
        Self {
            state: *state,
            geometry: state.geometry(),
            label: state.display_label(),
            access: state.field_access(),
        }
    }
}

impl Changed {
    fn between(old: &Published, new: &Published) -> Self {
        let (a, b) = (&old.state, &new.state);
        let mut changed = Self::empty();
        changed.set(Self::SOURCE, a.source != b.source);
        changed.set(Self::MODE, a.mode != b.mode);
        changed.set(Self::MODULUS, a.modulus != b.modulus);
        changed.set(
            Self::MAINTAIN_ASPECT_RATIO,
            a.maintain_aspect_ratio != b.maintain_aspect_ratio,
        );
        changed.set(Self::WIDTH, a.width != b.width);
        changed.set(Self::HEIGHT, a.height != b.height);
        changed.set(
            Self::CROP,
            a.crop != b.crop || a.custom_crop != b.custom_crop,
        );
        changed.set(Self::DISPLAY_WIDTH, a.display_width != b.display_width);
        changed.set(Self::PIXEL_ASPECT, a.pixel_aspect != b.pixel_aspect);
        changed.set(
            Self::MAX_SIZE,
            a.max_width() != b.max_width() || a.max_height() != b.max_height(),
        );
        changed.set(Self::GEOMETRY, old.geometry != new.geometry);
        changed.set(Self::DISPLAY_LABEL, old.label != new.label);
        changed.set(Self::FIELD_ACCESS, old.access != new.access);
        changed
    }
}

/// A picture-settings edit session.
///
/// Starts with no source; every setter re-derives the dependent fields and
/// returns what changed.
///
/// # Example
///
/// ```
/// use picture_geometry::{AnamorphicMode, Changed, PictureSettings, PixelAspect, SourceDescriptor};
///
/// let mut settings = PictureSettings::new();
/// assert_eq!(settings.display_label().to_string(), "No source");
///
/// let source = SourceDescriptor::new(1920, 1080, PixelAspect::SQUARE).unwrap();
/// settings.select_source(source, None);
///
/// let changed = settings.set_mode(AnamorphicMode::Loose);
/// assert!(changed.contains(Changed::FIELD_ACCESS));
///
/// settings.set_width(1280);
/// assert_eq!(settings.display_label().to_string(), "1280x720");
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PictureSettings {
    state: GeometryState,
}

impl PictureSettings {
    /// A session with default settings and no source.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GeometryState {
        &self.state
    }

    /// Apply one edit and report what changed.
    pub fn apply(&mut self, edit: Edit) -> Changed {
        self.apply_all([edit])
    }

    /// Apply edits in order and report the net change.
    pub fn apply_all(&mut self, edits: impl IntoIterator<Item = Edit>) -> Changed {
        let before = Published::of(&self.state);
        for edit in edits {
            #[cfg(feature = "tracing")]
            tracing::trace!(?edit, "applying picture edit");
            self.state = resolve(&self.state, edit);
        }
        let changed = Changed::between(&before, &Published::of(&self.state));
        #[cfg(feature = "tracing")]
        tracing::trace!(?changed, label = %self.state.display_label(), "picture settings updated");
        changed
    }

    // ── Setters ─────────────────────────────────────────────────────────

    pub fn set_width(&mut self, width: u32) -> Changed {
        self.apply(Edit::Width(width))
    }

    pub fn set_height(&mut self, height: u32) -> Changed {
        self.apply(Edit::Height(height))
    }

    pub fn set_modulus(&mut self, modulus: u32) -> Changed {
        self.apply(Edit::Modulus(modulus))
    }

    pub fn set_mode(&mut self, mode: AnamorphicMode) -> Changed {
        self.apply(Edit::Mode(mode))
    }

    pub fn set_maintain_aspect_ratio(&mut self, on: bool) -> Changed {
        self.apply(Edit::MaintainAspectRatio(on))
    }

    pub fn set_crop(&mut self, edge: CropEdge, value: u32) -> Changed {
        self.apply(Edit::Crop(edge, value))
    }

    pub fn set_crop_all(&mut self, crop: Crop) -> Changed {
        self.apply(Edit::SetCrop(crop))
    }

    pub fn use_auto_crop(&mut self) -> Changed {
        self.apply(Edit::AutoCrop)
    }

    pub fn set_display_width(&mut self, width: u32) -> Changed {
        self.apply(Edit::DisplayWidth(width))
    }

    pub fn set_pixel_aspect_width(&mut self, width: u32) -> Changed {
        self.apply(Edit::PixelAspectWidth(width))
    }

    pub fn set_pixel_aspect_height(&mut self, height: u32) -> Changed {
        self.apply(Edit::PixelAspectHeight(height))
    }

    pub fn set_max_size(&mut self, width: Option<u32>, height: Option<u32>) -> Changed {
        self.apply(Edit::MaxSize { width, height })
    }

    /// Load a new source title. An explicit `crop` overrides detection.
    pub fn select_source(&mut self, source: SourceDescriptor, crop: Option<Crop>) -> Changed {
        self.apply(Edit::SelectSource { source, crop })
    }

    pub fn reset(&mut self) -> Changed {
        self.apply(Edit::Reset)
    }

    // ── Published values ────────────────────────────────────────────────

    /// Storage width field. `0` while the mode derives it.
    pub fn width(&self) -> u32 {
        self.state.width
    }

    /// Storage height field. `0` while the mode derives it.
    pub fn height(&self) -> u32 {
        self.state.height
    }

    pub fn geometry(&self) -> Geometry {
        self.state.geometry()
    }

    pub fn display_label(&self) -> DisplayLabel {
        self.state.display_label()
    }

    pub fn field_access(&self) -> FieldAccess {
        self.state.field_access()
    }

    /// The loaded source, which formats as its info line.
    pub fn source_info(&self) -> Option<&SourceDescriptor> {
        self.state.source.as_ref()
    }
}
