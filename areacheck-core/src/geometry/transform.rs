use crate::r2::R2;
use crate::viewport::Viewport;

/// Logical pixels kept free on every edge for arrowheads and tick labels.
pub const PAD: f64 = 26.;

/// Half-width of the visible axis range: both axes always show [-5, 5].
pub const AXIS_EXTENT: f64 = 5.;

/// Maps axis units to logical (CSS) pixels.
///
/// The origin sits at the (rounded) viewport center, the y axis points up, and
/// each axis is scaled independently so that [`AXIS_EXTENT`] units reach the
/// inner edge of the [`PAD`] margin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AxisTransform {
    pub origin: R2,
    pub scale: R2,
}

impl AxisTransform {
    pub fn new(viewport: &Viewport) -> Self {
        let (w, h) = (viewport.width, viewport.height);
        AxisTransform {
            origin: R2::new((w / 2.).round(), (h / 2.).round()),
            scale: R2::new((w / 2. - PAD) / AXIS_EXTENT, (h / 2. - PAD) / AXIS_EXTENT),
        }
    }

    /// Horizontal pixel position of axis value `x`.
    pub fn x(&self, x: f64) -> f64 {
        self.origin.x + x * self.scale.x
    }

    /// Vertical pixel position of axis value `y`.
    pub fn y(&self, y: f64) -> f64 {
        self.origin.y - y * self.scale.y
    }

    pub fn apply(&self, p: R2) -> R2 {
        R2::new(self.x(p.x), self.y(p.y))
    }
}
