//! Physical units used throughout layout.
//!
//! All layout happens in PDF points ([Pt], 72 per inch) with the origin at the
//! bottom-left corner of the bleed canvas. Product dimensions are specified in
//! inches ([In]) and converted once, up front. Raster backends convert points
//! into device pixels with [Pt::to_px].

use derive_more::{Add, AddAssign, Deref, Display, From, Into, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul, Neg};

/// Points per inch in PDF user space
pub const POINTS_PER_INCH: f32 = 72.0;

/// A length in PDF points (1/72 inch)
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    Sub,
    AddAssign,
    SubAssign,
    Sum,
    From,
    Into,
    Deref,
    Display,
    Serialize,
    Deserialize,
)]
#[display("{_0}pt")]
pub struct Pt(pub f32);

/// A length in inches
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    Sub,
    From,
    Into,
    Deref,
    Display,
    Serialize,
    Deserialize,
)]
#[display("{_0}in")]
pub struct In(pub f32);

impl Pt {
    pub const ZERO: Pt = Pt(0.0);

    /// Convert to device units at the given resolution
    pub fn to_px(self, dpi: f32) -> f32 {
        self.0 * dpi / POINTS_PER_INCH
    }

    pub fn abs(self) -> Pt {
        Pt(self.0.abs())
    }

    pub fn min(self, other: Pt) -> Pt {
        Pt(self.0.min(other.0))
    }

    pub fn max(self, other: Pt) -> Pt {
        Pt(self.0.max(other.0))
    }
}

impl In {
    /// Convert to device units at the given resolution. At 72 dpi this is the
    /// same as converting to points.
    pub fn to_device(self, dpi: f32) -> f32 {
        self.0 * dpi
    }
}

impl From<In> for Pt {
    fn from(value: In) -> Self {
        Pt(value.0 * POINTS_PER_INCH)
    }
}

impl Mul<f32> for Pt {
    type Output = Pt;

    fn mul(self, rhs: f32) -> Pt {
        Pt(self.0 * rhs)
    }
}

impl Mul<Pt> for f32 {
    type Output = Pt;

    fn mul(self, rhs: Pt) -> Pt {
        Pt(self * rhs.0)
    }
}

impl Div<f32> for Pt {
    type Output = Pt;

    fn div(self, rhs: f32) -> Pt {
        Pt(self.0 / rhs)
    }
}

/// Dividing two lengths yields a unitless ratio
impl Div<Pt> for Pt {
    type Output = f32;

    fn div(self, rhs: Pt) -> f32 {
        self.0 / rhs.0
    }
}

impl Neg for Pt {
    type Output = Pt;

    fn neg(self) -> Pt {
        Pt(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inches_convert_to_points() {
        assert_eq!(Pt::from(In(1.25)), Pt(90.0));
        assert_eq!(Pt::from(In(0.125)), Pt(9.0));
    }

    #[test]
    fn points_convert_to_pixels() {
        assert_eq!(Pt(72.0).to_px(300.0), 300.0);
        assert_eq!(In(6.25).to_device(300.0), 1875.0);
    }

    #[test]
    fn ratio_of_lengths_is_unitless() {
        let r: f32 = Pt(30.0) / Pt(20.0);
        assert_eq!(r, 1.5);
    }
}
