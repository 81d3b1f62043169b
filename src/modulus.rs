//! Block-alignment rounding for storage dimensions.
//!
//! Encoders want frame dimensions that divide cleanly into their block
//! size. [`round_to_modulus`] snaps a value to the nearest multiple, with
//! ties rounding up (not half-even).

use core::fmt;

use num_traits::Float;

use crate::GeometryError;

/// Required divisor for storage dimensions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u32", into = "u32")
)]
pub enum Modulus {
    Two,
    Four,
    Eight,
    /// Macroblock alignment. The default.
    #[default]
    Sixteen,
}

impl Modulus {
    /// Every allowed modulus, smallest first.
    pub const ALL: [Self; 4] = [Self::Two, Self::Four, Self::Eight, Self::Sixteen];

    /// Validate a raw modulus. Only 2, 4, 8 and 16 are accepted.
    pub fn new(value: u32) -> Result<Self, GeometryError> {
        match value {
            2 => Ok(Self::Two),
            4 => Ok(Self::Four),
            8 => Ok(Self::Eight),
            16 => Ok(Self::Sixteen),
            other => Err(GeometryError::InvalidModulus(other)),
        }
    }

    /// Correct any raw value to the closest allowed modulus.
    ///
    /// Ties go to the larger modulus, so `3` becomes 4 and `12` becomes 16.
    pub fn nearest(value: u32) -> Self {
        let mut best = Self::Two;
        for m in Self::ALL {
            if value.abs_diff(m.get()) <= value.abs_diff(best.get()) {
                best = m;
            }
        }
        best
    }

    /// The divisor as an integer.
    pub const fn get(self) -> u32 {
        match self {
            Self::Two => 2,
            Self::Four => 4,
            Self::Eight => 8,
            Self::Sixteen => 16,
        }
    }

    /// Round `value` to the nearest multiple of this modulus.
    pub fn round(self, value: f64) -> u32 {
        round_nonzero(value, self.get())
    }

    /// Round `value` to a multiple of this modulus that respects `bound`.
    ///
    /// When rounding lands above the bound the result steps down to the
    /// largest multiple that fits. The result is never zero: a bound smaller
    /// than one modulus step yields one step.
    pub fn fit(self, value: f64, bound: Option<u32>) -> u32 {
        let m = self.get();
        let mut v = self.round(value);
        if let Some(max) = bound
            && v > max
        {
            v = max - max % m;
        }
        if v == 0 { m } else { v }
    }
}

impl fmt::Display for Modulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl TryFrom<u32> for Modulus {
    type Error = GeometryError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Modulus> for u32 {
    fn from(m: Modulus) -> u32 {
        m.get()
    }
}

/// Round `value` to the nearest multiple of `modulus`.
///
/// A remainder of at least half a step rounds up, anything less rounds
/// down; an exact multiple is returned as-is. Negative and non-finite
/// values saturate to 0.
///
/// ```
/// use picture_geometry::round_to_modulus;
///
/// assert_eq!(round_to_modulus(1000.0, 16), Ok(1008));
/// assert_eq!(round_to_modulus(720.5, 16), Ok(720));
/// assert_eq!(round_to_modulus(24.0, 16), Ok(32)); // tie rounds up
/// ```
pub fn round_to_modulus(value: f64, modulus: u32) -> Result<u32, GeometryError> {
    if modulus == 0 {
        return Err(GeometryError::InvalidModulus(modulus));
    }
    Ok(round_nonzero(value, modulus))
}

fn round_nonzero(value: f64, modulus: u32) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let m = modulus as f64;
    // Work from the floor quotient so the result is an exact multiple.
    let quotient = Float::floor(value / m);
    let remainder = value - quotient * m;
    let steps = if remainder >= m / 2.0 {
        quotient + 1.0
    } else {
        quotient
    };
    let max_steps = (u32::MAX / modulus) as f64;
    (Float::min(steps, max_steps) as u32) * modulus
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── round_to_modulus ────────────────────────────────────────────────

    #[test]
    fn exact_multiple_unchanged() {
        assert_eq!(round_to_modulus(1280.0, 16), Ok(1280));
        assert_eq!(round_to_modulus(720.0, 8), Ok(720));
    }

    #[test]
    fn rounds_to_nearest_step() {
        // 1079 % 16 = 7 → down; 1085 % 16 = 13 → up
        assert_eq!(round_to_modulus(1079.0, 16), Ok(1072));
        assert_eq!(round_to_modulus(1085.0, 16), Ok(1088));
    }

    #[test]
    fn tie_rounds_up() {
        assert_eq!(round_to_modulus(1080.0, 16), Ok(1088));
        assert_eq!(round_to_modulus(6.0, 4), Ok(8));
        assert_eq!(round_to_modulus(1.0, 2), Ok(2));
    }

    #[test]
    fn fractional_input() {
        // 720.5 % 16 = 0.5 → down
        assert_eq!(round_to_modulus(720.5, 16), Ok(720));
        assert_eq!(round_to_modulus(1007.9, 16), Ok(1008));
    }

    #[test]
    fn zero_modulus_is_invalid() {
        assert_eq!(
            round_to_modulus(100.0, 0),
            Err(GeometryError::InvalidModulus(0))
        );
    }

    #[test]
    fn negative_and_nan_saturate() {
        assert_eq!(round_to_modulus(-40.0, 16), Ok(0));
        assert_eq!(round_to_modulus(f64::NAN, 16), Ok(0));
        assert_eq!(round_to_modulus(f64::INFINITY, 16), Ok(0));
    }

    #[test]
    fn small_value_rounds_to_zero() {
        assert_eq!(round_to_modulus(7.0, 16), Ok(0));
    }

    #[test]
    fn huge_value_stays_a_multiple() {
        let v = round_to_modulus(1e12, 16).unwrap();
        assert_eq!(v % 16, 0);
    }

    // ── Modulus ─────────────────────────────────────────────────────────

    #[test]
    fn new_accepts_only_allowed() {
        assert_eq!(Modulus::new(8), Ok(Modulus::Eight));
        assert_eq!(Modulus::new(6), Err(GeometryError::InvalidModulus(6)));
        assert_eq!(Modulus::new(0), Err(GeometryError::InvalidModulus(0)));
    }

    #[test]
    fn nearest_corrects() {
        assert_eq!(Modulus::nearest(0), Modulus::Two);
        assert_eq!(Modulus::nearest(3), Modulus::Four);
        assert_eq!(Modulus::nearest(5), Modulus::Four);
        assert_eq!(Modulus::nearest(6), Modulus::Eight);
        assert_eq!(Modulus::nearest(12), Modulus::Sixteen);
        assert_eq!(Modulus::nearest(1000), Modulus::Sixteen);
        assert_eq!(Modulus::nearest(8), Modulus::Eight);
    }

    #[test]
    fn fit_steps_down_to_bound() {
        // 1080 rounds up to 1088, which exceeds the bound → 1072
        assert_eq!(Modulus::Sixteen.fit(1080.0, Some(1080)), 1072);
        assert_eq!(Modulus::Sixteen.fit(1080.0, None), 1088);
        assert_eq!(Modulus::Eight.fit(1080.0, Some(1080)), 1080);
    }

    #[test]
    fn fit_never_zero() {
        assert_eq!(Modulus::Sixteen.fit(3.0, None), 16);
        assert_eq!(Modulus::Sixteen.fit(100.0, Some(10)), 16);
    }

    #[test]
    fn display_is_integer() {
        assert_eq!(Modulus::Four.to_string(), "4");
    }
}
