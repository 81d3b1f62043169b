//! Saved picture settings and how they enter a session.
//!
//! A [`Preset`] is never copied into the state verbatim. Applying one replays
//! it as ordinary edits, so a preset saved against a larger source, or with
//! fields that contradict each other, still lands in a consistent state.

use crate::anamorphic::AnamorphicMode;
use crate::crop::Crop;
use crate::mediator::{Changed, PictureSettings};
use crate::modulus::Modulus;
use crate::source::PixelAspect;
use crate::state::Edit;

/// Picture settings as stored in a configuration.
///
/// Any combination of fields may be present. With the `serde` feature,
/// missing fields take their defaults.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Preset {
    pub mode: AnamorphicMode,
    pub modulus: Option<Modulus>,
    /// Keep display aspect. Always on for [`AnamorphicMode::None`].
    pub maintain_aspect_ratio: bool,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    /// Explicit crop. `None` means "use detected bars".
    pub crop: Option<Crop>,
    pub display_width: Option<u32>,
    pub pixel_aspect: Option<PixelAspect>,
}

impl Preset {
    /// The edits that replay this preset, given the session's current
    /// cropped width for the default width.
    fn edits(&self, cropped_width: Option<u32>) -> impl Iterator<Item = Edit> + use<> {
        let custom = self.mode == AnamorphicMode::Custom;
        let maintain = self.mode == AnamorphicMode::None || self.maintain_aspect_ratio;
        let width = self.width.or(cropped_width);
        let crop_edit = match self.crop {
            Some(crop) => Edit::SetCrop(crop),
            None => Edit::AutoCrop,
        };
        let par = self.pixel_aspect.filter(|_| custom);
        [
            Some(Edit::Mode(self.mode)),
            Some(Edit::MaxSize {
                width: self.max_width,
                height: self.max_height,
            }),
            width.map(Edit::Width),
            self.height.map(Edit::Height),
            Some(Edit::MaintainAspectRatio(maintain)),
            self.display_width.filter(|_| custom).map(Edit::DisplayWidth),
            par.map(|p| Edit::PixelAspectWidth(p.width())),
            par.map(|p| Edit::PixelAspectHeight(p.height())),
            self.modulus.map(|m| Edit::Modulus(m.get())),
            Some(crop_edit),
        ]
        .into_iter()
        .flatten()
    }
}

impl PictureSettings {
    /// Apply a saved configuration through the regular edit paths.
    ///
    /// Order: mode, limits, width (the preset's, else the cropped source
    /// width), height, aspect flag, display width, pixel aspect, modulus,
    /// crop. With the aspect flag on, the pixel aspect lands last and wins.
    pub fn apply_preset(&mut self, preset: &Preset) -> Changed {
        #[cfg(feature = "tracing")]
        tracing::debug!(?preset, "applying preset");
        let cropped_width = self.state().cropped().map(|s| s.width);
        self.apply_all(preset.edits(cropped_width))
    }

    /// Snapshot the session as a preset.
    ///
    /// Sentinel (zero) sizes and custom-only fields outside `Custom` are
    /// left out; the crop is included only when it is custom.
    pub fn preset(&self) -> Preset {
        let s = self.state();
        let custom = s.mode == AnamorphicMode::Custom;
        Preset {
            mode: s.mode,
            modulus: Some(s.modulus),
            maintain_aspect_ratio: s.maintain_aspect_ratio,
            width: Some(s.width).filter(|&w| w > 0),
            height: Some(s.height).filter(|&h| h > 0),
            max_width: s.max_width,
            max_height: s.max_height,
            crop: s.custom_crop.then_some(s.crop),
            display_width: custom.then_some(s.display_width),
            pixel_aspect: custom.then_some(s.pixel_aspect),
        }
    }
}
