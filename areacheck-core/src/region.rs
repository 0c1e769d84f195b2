//! The admissible area, as a union of three quadrant-specific shapes scaled by R.

use std::f64::consts::PI;
use std::fmt::{self, Display, Formatter};
use std::ops::RangeInclusive;

use crate::r2::R2;
use crate::validate::parse_decimal;

/// The region scale parameter R, always within [`RegionParameter::RANGE`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RegionParameter(f64);

impl RegionParameter {
    pub const RANGE: RangeInclusive<f64> = 2.0..=5.0;
    pub const DEFAULT: RegionParameter = RegionParameter(2.);

    /// `None` unless `r` is finite and in range.
    pub fn new(r: f64) -> Option<Self> {
        (r.is_finite() && Self::RANGE.contains(&r)).then_some(RegionParameter(r))
    }

    /// Reads R from raw field text, falling back to [`RegionParameter::DEFAULT`].
    pub fn from_input(text: Option<&str>) -> Self {
        text.and_then(parse_decimal)
            .and_then(Self::new)
            .unwrap_or(Self::DEFAULT)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for RegionParameter {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Display for RegionParameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One piece of the admissible area, in axis units.
#[derive(Debug, Clone, PartialEq)]
pub enum SubRegion {
    /// Axis-aligned rectangle spanning two opposite corners.
    Rectangle { corner: R2, opposite: R2 },
    /// Elliptical wedge around `center`, swept clockwise on screen from `start` to `end`
    /// (canvas angles, radians) and closed back to the center.
    Wedge { center: R2, radius: f64, start: f64, end: f64 },
    Triangle { vertices: [R2; 3] },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub r: RegionParameter,
    pub parts: [SubRegion; 3],
}

impl Region {
    pub fn new(param: RegionParameter) -> Self {
        let r = param.value();
        let a = r.abs();
        Region {
            r: param,
            parts: [
                SubRegion::Rectangle {
                    corner: R2::ORIGIN,
                    opposite: R2::new(r / 2., -r),
                },
                // 270° ("straight down") to 180° ("straight left")
                SubRegion::Wedge {
                    center: R2::ORIGIN,
                    radius: a / 2.,
                    start: 1.5 * PI,
                    end: PI,
                },
                SubRegion::Triangle {
                    vertices: [R2::ORIGIN, R2::new(0., a), R2::new(a, 0.)],
                },
            ],
        }
    }
}
