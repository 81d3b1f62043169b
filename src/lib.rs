//! Anamorphic picture geometry for video transcoding.
//!
//! Given a source's resolution, pixel aspect and crop, derives output
//! storage size, display size and pixel aspect under one of four anamorphic
//! modes, with modulus alignment and optional size limits.
//!
//! Pure arithmetic: no I/O, no allocations, `no_std` compatible.
//!
//! # Modules
//!
//! - [`modulus`]: Block-alignment rounding and the [`Modulus`] type
//! - [`crop`]: Even-edge crop correction and crop-adjusted dimensions
//! - [`source`]: Source description, [`Size`], [`PixelAspect`]
//! - [`anamorphic`]: Anamorphic modes and per-mode geometry resolution
//! - [`state`]: Picture settings state and the pure edit transition
//! - [`mediator`]: Stateful edit session reporting changed fields
//! - [`preset`]: Saved settings replayed through the edit paths

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

use core::fmt;

pub mod anamorphic;
pub mod crop;
pub mod mediator;
pub mod modulus;
pub mod preset;
pub mod source;
pub mod state;

pub use anamorphic::{AnamorphicMode, Frame, Geometry, Request};
pub use crop::{Crop, CropEdge, correct_crop};
pub use mediator::{Changed, PictureSettings};
pub use modulus::{Modulus, round_to_modulus};
pub use preset::Preset;
pub use source::{PixelAspect, Size, SourceDescriptor};
pub use state::{DisplayLabel, Edit, FieldAccess, GeometryState, Phase, resolve};

/// Geometry computation error.
///
/// Only the pure functions return these. [`PictureSettings`] corrects or
/// absorbs every one of them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GeometryError {
    /// Source has zero width or height.
    ZeroSourceDimension,
    /// Modulus is not one of 2, 4, 8, 16 (or is zero for raw rounding).
    InvalidModulus(u32),
    /// Crop leaves no pixels on some axis.
    CropExceedsSource,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSourceDimension => f.write_str("source has a zero dimension"),
            Self::InvalidModulus(m) => write!(f, "invalid modulus {m}"),
            Self::CropExceedsSource => f.write_str("crop removes the whole frame"),
        }
    }
}

impl core::error::Error for GeometryError {}
