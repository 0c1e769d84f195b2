use approx::{AbsDiffEq, RelativeEq};

use serde::{Deserialize, Serialize};
use tsify::Tsify;

/// A point (or offset) in the plane, either in axis units or in pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize, Tsify)]
pub struct R2 {
    pub x: f64,
    pub y: f64,
}

impl R2 {
    pub const ORIGIN: R2 = R2 { x: 0., y: 0. };

    pub fn new(x: f64, y: f64) -> Self {
        R2 { x, y }
    }
}

impl AbsDiffEq for R2 {
    type Epsilon = f64;
    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }
    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon) && self.y.abs_diff_eq(&other.y, epsilon)
    }
}

impl RelativeEq for R2 {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }
    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative) && self.y.relative_eq(&other.y, epsilon, max_relative)
    }
}
